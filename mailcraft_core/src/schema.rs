//! Property schema table: the single source of truth for which properties each
//! element kind carries, their defaults, how the property panel edits them and
//! what both renderers fall back to when a value is unusable.

use crate::element::{ElementKind, PropertyValue};
use crate::collections::Progression;

/// How a property is edited in the property panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TextInput,
    TextArea { rows: u8 },
    Url,
    Color,
    Select(&'static [SelectOption]),
    Checkbox,
    /// Structural properties that are never edited directly
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// How a raw value is interpreted at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// Emitted inside a `style` attribute
    Css,
    /// Free text or URL, escaped but otherwise untouched
    Free,
    /// Boolean flag
    Flag,
    /// One of a closed list of keywords
    OneOf(&'static [&'static str]),
    /// Ordered child id list (groups only)
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Text(&'static str),
    Flag(bool),
    Children,
}

impl DefaultValue {
    pub fn to_value(self) -> PropertyValue {
        match self {
            DefaultValue::Text(s) => PropertyValue::Text(s.to_string()),
            DefaultValue::Flag(b) => PropertyValue::Flag(b),
            DefaultValue::Children => PropertyValue::Children(Progression::new()),
        }
    }
}

/// One row of the schema table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    pub name: &'static str,
    pub label: &'static str,
    pub control: Control,
    pub rule: ValueRule,
    pub default: DefaultValue,
    /// Used by the renderers when the stored value is missing or unusable
    pub fallback: &'static str,
    pub placeholder: Option<&'static str>,
}

pub const ALIGNMENTS: &[&str] = &["left", "center", "right", "justify"];
pub const LAYOUTS: &[&str] = &["column", "row"];

const ALIGN_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "left", label: "Left" },
    SelectOption { value: "center", label: "Center" },
    SelectOption { value: "right", label: "Right" },
];

const FONT_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "Arial, sans-serif", label: "Arial" },
    SelectOption { value: "'Times New Roman', serif", label: "Times New Roman" },
    SelectOption { value: "'Courier New', monospace", label: "Courier New" },
];

const LAYOUT_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "column", label: "Column" },
    SelectOption { value: "row", label: "Row" },
];

pub const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='300' height='200'%3E%3Crect fill='%23ddd' width='300' height='200'/%3E%3Ctext fill='%23999' font-family='sans-serif' font-size='18' dy='10.5' font-weight='bold' x='50%25' y='50%25' text-anchor='middle'%3E300 x 200%3C/text%3E%3C/svg%3E";

const fn prop(
    name: &'static str,
    label: &'static str,
    control: Control,
    rule: ValueRule,
    default: DefaultValue,
    fallback: &'static str,
) -> PropertySpec {
    PropertySpec {
        name,
        label,
        control,
        rule,
        default,
        fallback,
        placeholder: None,
    }
}

const fn size(name: &'static str, label: &'static str, default: &'static str, placeholder: &'static str) -> PropertySpec {
    PropertySpec {
        name,
        label,
        control: Control::TextInput,
        rule: ValueRule::Css,
        default: DefaultValue::Text(default),
        fallback: "auto",
        placeholder: Some(placeholder),
    }
}

const TEXT_SCHEMA: &[PropertySpec] = &[
    prop("content", "Content", Control::TextArea { rows: 3 }, ValueRule::Free, DefaultValue::Text("Enter your text here"), ""),
    size("width", "Width", "auto", "auto, 100px, 50%"),
    size("height", "Height", "auto", "auto, 100px"),
    prop("fontSize", "Font size", Control::TextInput, ValueRule::Css, DefaultValue::Text("14px"), "14px"),
    prop("fontFamily", "Font", Control::Select(FONT_OPTIONS), ValueRule::Css, DefaultValue::Text(DEFAULT_FONT_FAMILY), DEFAULT_FONT_FAMILY),
    prop("color", "Color", Control::Color, ValueRule::Css, DefaultValue::Text("#000000"), "#000000"),
    prop("textAlign", "Alignment", Control::Select(ALIGN_OPTIONS), ValueRule::OneOf(ALIGNMENTS), DefaultValue::Text("left"), "left"),
    prop("bold", "Bold", Control::Checkbox, ValueRule::Flag, DefaultValue::Flag(false), "false"),
    prop("italic", "Italic", Control::Checkbox, ValueRule::Flag, DefaultValue::Flag(false), "false"),
];

const BUTTON_SCHEMA: &[PropertySpec] = &[
    prop("text", "Text", Control::TextInput, ValueRule::Free, DefaultValue::Text("Click Here"), ""),
    prop("link", "Link", Control::Url, ValueRule::Free, DefaultValue::Text("https://example.com"), "#"),
    size("width", "Width", "auto", "auto, 100px, 50%"),
    size("height", "Height", "auto", "auto, 100px"),
    prop("backgroundColor", "Background color", Control::Color, ValueRule::Css, DefaultValue::Text("#0066cc"), "#0066cc"),
    prop("textColor", "Text color", Control::Color, ValueRule::Css, DefaultValue::Text("#ffffff"), "#ffffff"),
    prop("borderRadius", "Border radius", Control::TextInput, ValueRule::Css, DefaultValue::Text("4px"), "0"),
    prop("padding", "Padding", Control::TextInput, ValueRule::Css, DefaultValue::Text("10px 20px"), "0"),
];

const IMAGE_SCHEMA: &[PropertySpec] = &[
    prop("src", "Image URL", Control::Url, ValueRule::Free, DefaultValue::Text(PLACEHOLDER_IMAGE), ""),
    prop("alt", "Alt text", Control::TextInput, ValueRule::Free, DefaultValue::Text("Image description"), ""),
    size("width", "Width", "300px", "300px, 100%"),
    size("height", "Height", "auto", "auto, 200px"),
    prop("textAlign", "Alignment", Control::Select(ALIGN_OPTIONS), ValueRule::OneOf(ALIGNMENTS), DefaultValue::Text("center"), "center"),
];

const GROUP_SCHEMA: &[PropertySpec] = &[
    prop("layout", "Layout", Control::Select(LAYOUT_OPTIONS), ValueRule::OneOf(LAYOUTS), DefaultValue::Text("column"), "column"),
    prop("backgroundColor", "Background color", Control::Color, ValueRule::Css, DefaultValue::Text("transparent"), "transparent"),
    prop("padding", "Padding", Control::TextInput, ValueRule::Css, DefaultValue::Text("10px"), "0"),
    PropertySpec {
        name: "border",
        label: "Border",
        control: Control::TextInput,
        rule: ValueRule::Css,
        default: DefaultValue::Text("none"),
        fallback: "none",
        placeholder: Some("1px solid #ccc"),
    },
    prop("textAlign", "Alignment", Control::Select(ALIGN_OPTIONS), ValueRule::OneOf(ALIGNMENTS), DefaultValue::Text("left"), "left"),
    prop("children", "Children", Control::Hidden, ValueRule::Children, DefaultValue::Children, ""),
];

/// Schema rows for a kind, in property-panel order
pub fn schema_for(kind: ElementKind) -> &'static [PropertySpec] {
    match kind {
        ElementKind::Text => TEXT_SCHEMA,
        ElementKind::Button => BUTTON_SCHEMA,
        ElementKind::Image => IMAGE_SCHEMA,
        ElementKind::Group => GROUP_SCHEMA,
    }
}

pub fn lookup(kind: ElementKind, name: &str) -> Option<&'static PropertySpec> {
    schema_for(kind).iter().find(|spec| spec.name == name)
}

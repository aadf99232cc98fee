//! The property panel: a form derived from the selected element's schema.

use super::style::escape_html;
use crate::document::Document;
use crate::element::{ElementId, ElementKind, PropertyValue};
use crate::schema::{Control, PropertySpec};
use serde::Serialize;
use std::fmt::Write as _;

pub const EMPTY_PANEL_HINT: &str = "Select an element to edit its properties";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "value_type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

/// What an edited control hands back
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    Checked(bool),
}

impl From<FieldInput> for PropertyValue {
    fn from(input: FieldInput) -> Self {
        match input {
            FieldInput::Text(s) => PropertyValue::Text(s),
            FieldInput::Checked(b) => PropertyValue::Flag(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelField {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    pub control: Control,
    pub value: FieldValue,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PanelAction {
    Delete(ElementId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelForm {
    pub element_id: ElementId,
    pub kind: ElementKind,
    pub title: String,
    pub fields: Vec<PanelField>,
    pub actions: Vec<PanelAction>,
}

impl PanelForm {
    pub fn field(&self, name: &str) -> Option<&PanelField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PropertyPanel {
    Empty { hint: String },
    Editing(PanelForm),
}

/// The panel for the current selection. A selection that no longer exists
/// gives the empty hint.
pub fn render_panel(document: &Document, selected: Option<&ElementId>) -> PropertyPanel {
    let Some(element) = selected.and_then(|id| document.get(id)) else {
        return PropertyPanel::Empty {
            hint: EMPTY_PANEL_HINT.to_string(),
        };
    };

    let fields = element
        .kind
        .schema()
        .iter()
        .filter(|spec| spec.control != Control::Hidden)
        .map(|spec| PanelField {
            name: spec.name,
            label: spec.label,
            control: spec.control,
            value: field_value(spec, element.properties.get(spec.name)),
            placeholder: spec.placeholder,
        })
        .collect();

    PropertyPanel::Editing(PanelForm {
        element_id: element.id.clone(),
        kind: element.kind,
        title: format!("{} Properties", element.kind.display_name()),
        fields,
        actions: vec![PanelAction::Delete(element.id.clone())],
    })
}

fn field_value(spec: &PropertySpec, value: Option<&PropertyValue>) -> FieldValue {
    match spec.control {
        Control::Checkbox => FieldValue::Checked(value.and_then(PropertyValue::as_flag).unwrap_or(false)),
        Control::Color => {
            let raw = value.map(PropertyValue::display).unwrap_or_default();
            FieldValue::Text(color_input_value(&raw))
        }
        _ => FieldValue::Text(value.map(PropertyValue::display).unwrap_or_default()),
    }
}

/// Colour pickers only accept `#rrggbb`; keywords such as `transparent`
/// show as white
fn color_input_value(raw: &str) -> String {
    let raw = raw.trim();
    let is_hex = raw.len() == 7 && raw.starts_with('#') && raw[1..].chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        raw.to_ascii_lowercase()
    } else {
        "#ffffff".to_string()
    }
}

impl PropertyPanel {
    pub fn form(&self) -> Option<&PanelForm> {
        match self {
            PropertyPanel::Empty { .. } => None,
            PropertyPanel::Editing(form) => Some(form),
        }
    }

    pub fn to_html(&self) -> String {
        let form = match self {
            PropertyPanel::Empty { hint } => {
                return format!(r#"<div class="property-panel empty"><p>{}</p></div>"#, escape_html(hint));
            }
            PropertyPanel::Editing(form) => form,
        };

        let mut out = format!(
            r#"<div class="property-panel" data-id="{}"><h3>{}</h3>"#,
            escape_html(form.element_id.as_str()),
            escape_html(&form.title)
        );
        for field in &form.fields {
            let _ = write!(out, r#"<div class="form-group"><label>{}</label>"#, escape_html(field.label));
            field_html(&mut out, field);
            out.push_str("</div>");
        }
        for action in &form.actions {
            match action {
                PanelAction::Delete(id) => {
                    let _ = write!(
                        out,
                        r#"<button class="btn-delete" data-action="delete" data-id="{}">Delete Element</button>"#,
                        escape_html(id.as_str())
                    );
                }
            }
        }
        out.push_str("</div>");
        out
    }

    /// Plain text rendering for terminals
    pub fn describe(&self) -> String {
        let form = match self {
            PropertyPanel::Empty { hint } => return format!("{}\n", hint),
            PropertyPanel::Editing(form) => form,
        };
        let mut out = format!("{} ({})\n", form.title, form.element_id);
        for field in &form.fields {
            let value = match &field.value {
                FieldValue::Text(s) => format!("{:?}", s),
                FieldValue::Checked(b) => format!("[{}]", if *b { "x" } else { " " }),
            };
            let _ = writeln!(out, "  {:<18} {:<18} {}", field.name, field.label, value);
        }
        out
    }
}

fn field_html(out: &mut String, field: &PanelField) {
    let name = field.name;
    let text = match &field.value {
        FieldValue::Text(s) => escape_html(s),
        FieldValue::Checked(_) => String::new(),
    };
    let placeholder = field
        .placeholder
        .map(|p| format!(r#" placeholder="{}""#, escape_html(p)))
        .unwrap_or_default();

    match field.control {
        Control::TextArea { rows } => {
            let _ = write!(out, r#"<textarea data-prop="{}" rows="{}"{}>{}</textarea>"#, name, rows, placeholder, text);
        }
        Control::Select(options) => {
            let _ = write!(out, r#"<select data-prop="{}">"#, name);
            for option in options {
                let selected = if matches!(&field.value, FieldValue::Text(v) if v == option.value) {
                    " selected"
                } else {
                    ""
                };
                let _ = write!(
                    out,
                    r#"<option value="{}"{}>{}</option>"#,
                    escape_html(option.value),
                    selected,
                    escape_html(option.label)
                );
            }
            out.push_str("</select>");
        }
        Control::Checkbox => {
            let checked = matches!(field.value, FieldValue::Checked(true));
            let _ = write!(
                out,
                r#"<input type="checkbox" data-prop="{}"{}>"#,
                name,
                if checked { " checked" } else { "" }
            );
        }
        Control::Color => {
            let _ = write!(out, r#"<input type="color" data-prop="{}" value="{}">"#, name, text);
        }
        Control::Url => {
            let _ = write!(out, r#"<input type="url" data-prop="{}" value="{}"{}>"#, name, text, placeholder);
        }
        Control::TextInput | Control::Hidden => {
            let _ = write!(out, r#"<input type="text" data-prop="{}" value="{}"{}>"#, name, text, placeholder);
        }
    }
}

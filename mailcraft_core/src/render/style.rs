//! Value resolution shared by both renderers: every stored value passes
//! through here so that malformed input degrades to the schema fallback.

use crate::element::Element;
use crate::schema::{self, ValueRule, DEFAULT_FONT_FAMILY};
use serde::Serialize;

/// Characters that would break out of a `style="..."` attribute or a
/// declaration
const CSS_BREAKERS: &[char] = &[';', '"', '<', '>', '{', '}', '\\'];

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escaped text with line breaks kept visible
pub fn escape_text(s: &str) -> String {
    escape_html(s).replace("\r\n", "\n").replace('\n', "<br>")
}

/// Serialise style declarations into an attribute value
pub fn style_attr(decls: &[(&'static str, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Column,
    Row,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Column => "column",
            Layout::Row => "row",
        }
    }
}

/// Read-only view of one element's properties with fallbacks applied
pub struct Resolved<'a> {
    element: &'a Element,
}

impl<'a> Resolved<'a> {
    pub fn new(element: &'a Element) -> Self {
        Self { element }
    }

    fn fallback(&self, name: &str) -> &'static str {
        schema::lookup(self.element.kind, name)
            .map(|spec| spec.fallback)
            .unwrap_or("")
    }

    /// A value safe to place in a style declaration
    pub fn css(&self, name: &str) -> String {
        let raw = self.element.properties.text(name).map(str::trim).unwrap_or("");
        if raw.is_empty() || raw.contains(CSS_BREAKERS) {
            self.fallback(name).to_string()
        } else {
            raw.to_string()
        }
    }

    /// Free text, unescaped; callers escape for their output
    pub fn text(&self, name: &str) -> &'a str {
        self.element.properties.text(name).unwrap_or("")
    }

    pub fn flag(&self, name: &str) -> bool {
        match self.element.properties.get(name).and_then(|v| v.as_flag()) {
            Some(flag) => flag,
            None => self.fallback(name) == "true",
        }
    }

    /// One of the schema's keywords, or the fallback
    pub fn keyword(&self, name: &str) -> &'static str {
        let allowed = match schema::lookup(self.element.kind, name).map(|spec| spec.rule) {
            Some(ValueRule::OneOf(allowed)) => allowed,
            _ => return self.fallback(name),
        };
        let raw = self
            .element
            .properties
            .text(name)
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_default();
        allowed
            .iter()
            .find(|keyword| **keyword == raw)
            .copied()
            .unwrap_or_else(|| self.fallback(name))
    }

    /// A link or image source; script URLs and blanks fall back
    pub fn url(&self, name: &str) -> String {
        let raw = self.text(name).trim();
        let lowered = raw.to_ascii_lowercase();
        if raw.is_empty() || lowered.starts_with("javascript:") || lowered.starts_with("vbscript:") {
            self.fallback(name).to_string()
        } else {
            raw.to_string()
        }
    }

    pub fn layout(&self) -> Layout {
        match self.keyword("layout") {
            "row" => Layout::Row,
            _ => Layout::Column,
        }
    }

    pub fn font_weight(&self) -> &'static str {
        if self.flag("bold") {
            "bold"
        } else {
            "normal"
        }
    }

    pub fn font_style(&self) -> &'static str {
        if self.flag("italic") {
            "italic"
        } else {
            "normal"
        }
    }
}

/// Pixel count of a size like `300px` or `300`, for HTML width/height attributes
pub fn pixel_attr(value: &str) -> Option<u32> {
    let digits = value.trim().strip_suffix("px").unwrap_or(value.trim());
    digits.trim().parse::<u32>().ok().filter(|px| *px > 0)
}

pub fn default_font() -> &'static str {
    DEFAULT_FONT_FAMILY
}

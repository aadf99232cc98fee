use crate::collections::Progression;
use crate::schema::{self, PropertySpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Opaque element identifier, stable for the element's lifetime
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Allocate a fresh id
    pub fn generate() -> Self {
        ElementId(format!("el_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        ElementId(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        ElementId(s)
    }
}

/// The closed set of element kinds
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Button,
    Image,
    Group,
}

impl ElementKind {
    /// Palette order
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Text,
        ElementKind::Button,
        ElementKind::Image,
        ElementKind::Group,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Button => "button",
            ElementKind::Image => "image",
            ElementKind::Group => "group",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ElementKind::Text => "Text Block",
            ElementKind::Button => "Button",
            ElementKind::Image => "Image",
            ElementKind::Group => "Group",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ElementKind::Text => "📝",
            ElementKind::Button => "🔘",
            ElementKind::Image => "🖼️",
            ElementKind::Group => "📦",
        }
    }

    pub fn schema(self) -> &'static [PropertySpec] {
        schema::schema_for(self)
    }

    /// A fresh, independently owned copy of the kind's default properties
    pub fn default_properties(self) -> Properties {
        self.schema()
            .iter()
            .map(|spec| (spec.name.to_string(), spec.default.to_value()))
            .collect()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element kind: {0} (expected text, button, image or group)")]
pub struct UnknownKind(pub String);

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A single property value. Flags are booleans, groups carry their ordered
/// child ids, everything else is a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Flag(bool),
    Text(String),
    Children(Progression<ElementId>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Booleans, or the strings an input control is likely to produce
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            PropertyValue::Flag(b) => Some(*b),
            PropertyValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Some(true),
                "false" | "0" | "off" | "no" | "" => Some(false),
                _ => None,
            },
            PropertyValue::Children(_) => None,
        }
    }

    pub fn as_children(&self) -> Option<&Progression<ElementId>> {
        match self {
            PropertyValue::Children(children) => Some(children),
            _ => None,
        }
    }

    /// Text shown in an editor control for this value
    pub fn display(&self) -> String {
        match self {
            PropertyValue::Flag(b) => b.to_string(),
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Children(children) => children
                .iter()
                .map(ElementId::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Flag(b)
    }
}

pub const CHILDREN: &str = "children";

/// Property name -> value mapping of one element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_text)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(PropertyValue::as_flag).unwrap_or(false)
    }

    /// Replace one value, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.0.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn children(&self) -> Option<&Progression<ElementId>> {
        self.get(CHILDREN).and_then(PropertyValue::as_children)
    }

    pub fn children_mut(&mut self) -> Option<&mut Progression<ElementId>> {
        match self.0.get_mut(CHILDREN) {
            Some(PropertyValue::Children(children)) => Some(children),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, PropertyValue)>>(iter: I) -> Self {
        Properties(iter.into_iter().collect())
    }
}

/// One node of the template tree. Serialises to the persisted
/// `{ id, type, props, parentId }` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(rename = "props", default)]
    pub properties: Properties,
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<ElementId>,
}

impl Element {
    /// Create an element of `kind` with a fresh id and its own copy of the
    /// kind's default properties
    pub fn new(kind: ElementKind, parent_id: Option<ElementId>) -> Self {
        Self {
            id: ElementId::generate(),
            kind,
            properties: kind.default_properties(),
            parent_id,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind == ElementKind::Group
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Child ids of a group; empty for every other kind
    pub fn child_ids(&self) -> &[ElementId] {
        self.properties
            .children()
            .map(Progression::list)
            .unwrap_or(&[])
    }

    /// Bring loaded data back in line with the kind's shape: non-groups lose
    /// any `children` entry and groups always have one. Returns true when
    /// something had to change.
    pub fn normalize(&mut self) -> bool {
        if self.is_group() {
            if self.properties.children().is_none() {
                self.properties
                    .set(CHILDREN, PropertyValue::Children(Progression::new()));
                return true;
            }
            false
        } else {
            self.properties.remove(CHILDREN).is_some()
        }
    }
}

#[cfg(test)]
mod tests;

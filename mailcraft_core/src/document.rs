//! The template document: a flat, id-indexed table of elements whose
//! insertion order decides vertical stacking in both renderers.

use crate::collections::Pile;
use crate::element::{Element, ElementId, ElementKind, PropertyValue, CHILDREN};
use crate::error::{BuilderError, Result};
use crate::schema::{self, ValueRule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Structural form of a document, the shape handed to storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Pile<ElementId, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains(id)
    }

    /// All elements in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter()
    }

    /// Resolve a group's child ids to elements, skipping ids that no longer exist
    pub fn children_of<'a>(&'a self, element: &'a Element) -> impl Iterator<Item = &'a Element> + 'a {
        element.child_ids().iter().filter_map(move |id| {
            let child = self.elements.get(id);
            if child.is_none() {
                debug!(parent_id = %element.id, child_id = %id, "skipping dangling child reference");
            }
            child
        })
    }

    /// Top-level elements in creation order. Elements whose parent is gone,
    /// or whose parent does not list them, are promoted here so that nothing
    /// in the table is unreachable.
    pub fn roots(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|element| !self.is_attached(element))
            .collect()
    }

    fn is_attached(&self, element: &Element) -> bool {
        let Some(parent_id) = element.parent_id.as_ref() else {
            return false;
        };
        match self.elements.get(parent_id) {
            Some(parent) if parent.child_ids().contains(&element.id) => true,
            _ => {
                debug!(element_id = %element.id, parent_id = %parent_id, "orphaned element placed at root");
                false
            }
        }
    }

    /// Build a new element for `kind`. A parent that is missing or not a
    /// group degrades to root placement.
    pub fn create_element(&self, kind: ElementKind, parent_id: Option<&ElementId>) -> Element {
        let parent_id = parent_id.and_then(|id| match self.elements.get(id) {
            Some(parent) if parent.is_group() => Some(id.clone()),
            Some(parent) => {
                warn!(parent_id = %id, parent_kind = %parent.kind, "drop target is not a group, placing at root");
                None
            }
            None => {
                warn!(parent_id = %id, "drop target does not exist, placing at root");
                None
            }
        });
        Element::new(kind, parent_id)
    }

    /// Create an element and attach it: appended to its parent's children
    /// and to the end of the document.
    pub fn insert(&mut self, kind: ElementKind, parent_id: Option<&ElementId>) -> ElementId {
        let element = self.create_element(kind, parent_id);
        let id = element.id.clone();

        if let Some(parent_id) = element.parent_id.as_ref() {
            if let Some(children) = self
                .elements
                .get_mut(parent_id)
                .and_then(|parent| parent.properties.children_mut())
            {
                children.push(id.clone());
            }
        }

        debug!(element_id = %id, kind = %kind, parent_id = ?element.parent_id, "element inserted");
        self.elements.insert(id.clone(), element);
        id
    }

    /// Remove an element and everything beneath it. Returns the ids that were
    /// actually removed, deepest-first.
    pub fn remove(&mut self, id: &ElementId) -> Vec<ElementId> {
        let mut removed = Vec::new();
        let mut visited = HashSet::new();
        self.remove_recursive(id, &mut removed, &mut visited);
        removed
    }

    fn remove_recursive(
        &mut self,
        id: &ElementId,
        removed: &mut Vec<ElementId>,
        visited: &mut HashSet<ElementId>,
    ) {
        if !visited.insert(id.clone()) {
            return;
        }

        // detach from every parent list first
        for element in self.elements.values_mut() {
            if let Some(children) = element.properties.children_mut() {
                children.remove(id);
            }
        }

        let mut descendants: Vec<ElementId> = self
            .elements
            .get(id)
            .map(|element| element.child_ids().to_vec())
            .unwrap_or_default();
        // back-references count too, in case a loaded parent list is incomplete
        let linked: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|element| element.parent_id.as_ref() == Some(id))
            .map(|element| element.id.clone())
            .collect();
        for child in linked {
            if !descendants.contains(&child) {
                descendants.push(child);
            }
        }

        for child in &descendants {
            self.remove_recursive(child, removed, visited);
        }

        if self.elements.remove(id).is_some() {
            removed.push(id.clone());
        }
    }

    /// Replace exactly one property value. The name must belong to the
    /// element's kind; the value itself is not checked.
    pub fn set_property(
        &mut self,
        id: &ElementId,
        name: &str,
        value: PropertyValue,
    ) -> Result<Option<PropertyValue>> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| BuilderError::ElementNotFound(id.clone()))?;

        let spec = schema::lookup(element.kind, name).ok_or_else(|| BuilderError::UnknownProperty {
            kind: element.kind,
            name: name.to_string(),
        })?;
        if spec.rule == ValueRule::Children || name == CHILDREN {
            return Err(BuilderError::ReadOnlyProperty {
                name: name.to_string(),
            });
        }

        Ok(element.properties.set(name, value))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.elements.iter().cloned().collect(),
        }
    }

    /// Rebuild a document from its structural form, repairing shape problems
    /// instead of rejecting them
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Self {
        let mut elements = Pile::new();
        for mut element in snapshot.elements {
            if element.normalize() {
                warn!(element_id = %element.id, kind = %element.kind, "repaired children property on load");
            }
            if elements.insert(element.id.clone(), element).is_some() {
                warn!("duplicate element id on load, keeping the last copy");
            }
        }
        Self { elements }
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.snapshot())?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let snapshot: DocumentSnapshot = serde_json::from_value(value)?;
        Ok(Self::from_snapshot(snapshot))
    }
}

use crate::element::{ElementId, ElementKind};
use crate::storage::TemplateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Something that changed the builder's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuilderEvent {
    Inserted {
        element_id: ElementId,
        kind: ElementKind,
        parent_id: Option<ElementId>,
    },
    Selected {
        element_id: Option<ElementId>,
    },
    /// Every id removed by one cascading delete, deepest first
    Deleted {
        element_ids: Vec<ElementId>,
    },
    PropertyUpdated {
        element_id: ElementId,
        property: String,
    },
    Cleared {
        removed: usize,
    },
    Loaded {
        template_id: Option<TemplateId>,
        elements: usize,
    },
    TemplateSaved {
        template_id: TemplateId,
        name: String,
    },
    TemplateDeleted {
        template_id: TemplateId,
    },
}

impl BuilderEvent {
    /// Whether the event changed the document itself
    pub fn mutates_document(&self) -> bool {
        !matches!(
            self,
            BuilderEvent::Selected { .. } | BuilderEvent::TemplateSaved { .. } | BuilderEvent::TemplateDeleted { .. }
        )
    }
}

impl fmt::Display for BuilderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderEvent::Inserted {
                element_id,
                kind,
                parent_id: Some(parent),
            } => write!(f, "inserted {} {} into {}", kind, element_id, parent),
            BuilderEvent::Inserted { element_id, kind, .. } => write!(f, "inserted {} {}", kind, element_id),
            BuilderEvent::Selected { element_id: Some(id) } => write!(f, "selected {}", id),
            BuilderEvent::Selected { element_id: None } => write!(f, "selection cleared"),
            BuilderEvent::Deleted { element_ids } => write!(f, "deleted {} element(s)", element_ids.len()),
            BuilderEvent::PropertyUpdated { element_id, property } => {
                write!(f, "updated {} on {}", property, element_id)
            }
            BuilderEvent::Cleared { removed } => write!(f, "cleared {} element(s)", removed),
            BuilderEvent::Loaded {
                template_id: Some(id),
                elements,
            } => write!(f, "loaded template {} ({} elements)", id, elements),
            BuilderEvent::Loaded { elements, .. } => write!(f, "loaded document ({} elements)", elements),
            BuilderEvent::TemplateSaved { template_id, name } => write!(f, "saved {:?} as {}", name, template_id),
            BuilderEvent::TemplateDeleted { template_id } => write!(f, "deleted template {}", template_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event
    pub event_id: Uuid,
    /// When this event was recorded
    pub timestamp: DateTime<Utc>,
    /// Document revision after the event was applied
    pub revision: u64,
}

impl EventMetadata {
    pub fn new(revision: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            revision,
        }
    }
}

use crate::config::ConfigError;
use crate::element::{ElementId, ElementKind};
use crate::mail::MailError;
use crate::storage::StorageError;
use thiserror::Error;

/// Raised when a group graph cannot be walked safely
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("group {id} contains itself through its children")]
    Cycle { id: ElementId },

    #[error("element {id} is nested deeper than {limit} levels")]
    DepthExceeded { id: ElementId, limit: usize },
}

pub type Result<T> = std::result::Result<T, BuilderError>;

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("{kind} elements have no property named {name:?}")]
    UnknownProperty { kind: ElementKind, name: String },

    #[error("property {name:?} cannot be edited directly")]
    ReadOnlyProperty { name: String },

    #[error("a template name is required")]
    MissingTemplateName,

    #[error("no user is signed in for this session")]
    MissingUser,

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

use super::types::TemplateId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Template not found: {0}")]
    NotFound(TemplateId),

    #[error("Template {0} is required")]
    MissingField(&'static str),

    #[error("File {path:?} holds template {found}, expected {expected}")]
    Mismatched {
        path: PathBuf,
        expected: TemplateId,
        found: TemplateId,
    },

    #[error("Template {0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// The template the error is about, when there is one
    pub fn template_id(&self) -> Option<TemplateId> {
        match self {
            StorageError::NotFound(id) => Some(*id),
            StorageError::Mismatched { expected, .. } => Some(*expected),
            _ => None,
        }
    }
}

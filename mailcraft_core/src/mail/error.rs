use thiserror::Error;

pub type Result<T> = std::result::Result<T, MailError>;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Message rejected: {0}")]
    Rejected(String),
}

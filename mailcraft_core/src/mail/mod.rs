//! Sending the exported template. Delivery itself belongs to the host; the
//! builder only composes messages and hands them to a [`MailSender`].

mod error;
mod outbox;

pub use error::{MailError, Result};
pub use outbox::{DeliveryStatus, OutboxSender, SentEmail};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_html: bool,
}

impl OutgoingEmail {
    pub fn html(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            is_html: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.to.trim().is_empty() {
            return Err(MailError::MissingField("to"));
        }
        if self.subject.trim().is_empty() {
            return Err(MailError::MissingField("subject"));
        }
        if self.body.trim().is_empty() {
            return Err(MailError::MissingField("body"));
        }
        if !looks_like_address(self.to.trim()) {
            return Err(MailError::InvalidRecipient(self.to.clone()));
        }
        if self.subject.contains(['\r', '\n']) {
            return Err(MailError::Rejected("subject must be a single line".to_string()));
        }
        Ok(())
    }

    pub fn content_type(&self) -> &'static str {
        if self.is_html {
            "text/html; charset=utf-8"
        } else {
            "text/plain; charset=utf-8"
        }
    }
}

/// `local@domain.tld`, nothing fancier
fn looks_like_address(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !address.chars().any(|c| c.is_whitespace() || c == '<' || c == '>' || c == ',')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: Uuid,
    pub sent_at: DateTime<Utc>,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt>;
}

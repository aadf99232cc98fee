use super::{MailError, MailSender, OutgoingEmail, Result, SendReceipt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Only successful hand-offs are recorded; a rejected message never reaches
/// the outbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Sent => f.write_str("sent"),
        }
    }
}

/// Record of one message handed to the outbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    pub id: Uuid,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    pub status: DeliveryStatus,
    pub created_at: DateTime<Utc>,
}

/// Delivers by writing each message as a JSON record into a directory that
/// a separate relay (or a person) picks up
#[derive(Debug, Clone)]
pub struct OutboxSender {
    dir: PathBuf,
}

impl OutboxSender {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Everything sent so far, newest first
    pub async fn history(&self) -> Result<Vec<SentEmail>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut sent = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .await
                .map_err(MailError::from)
                .and_then(|json| serde_json::from_str::<SentEmail>(&json).map_err(MailError::from));
            match parsed {
                Ok(record) => sent.push(record),
                Err(e) => warn!("Skipping unreadable outbox record {:?}: {}", path, e),
            }
        }

        sent.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(sent)
    }
}

#[async_trait]
impl MailSender for OutboxSender {
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt> {
        email.validate()?;

        let record = SentEmail {
            id: Uuid::new_v4(),
            to: email.to.trim().to_string(),
            subject: email.subject,
            body: email.body,
            is_html: email.is_html,
            status: DeliveryStatus::Sent,
            created_at: Utc::now(),
        };

        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}.json", record.id));
        debug!("Writing outbox record to {:?}", path);
        fs::write(&path, serde_json::to_string_pretty(&record)?).await?;

        info!(message_id = %record.id, to = %record.to, "email queued in outbox");
        Ok(SendReceipt {
            message_id: record.id,
            sent_at: record.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_send_writes_a_record() {
        let dir = tempdir().unwrap();
        let outbox = OutboxSender::new(dir.path().join("outbox"));

        let receipt = outbox
            .send(OutgoingEmail::html(" reader@example.com ", "News", "<p>Hello</p>"))
            .await
            .unwrap();

        let history = outbox.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.message_id);
        assert_eq!(history[0].to, "reader@example.com");
        assert_eq!(history[0].status, DeliveryStatus::Sent);
        assert!(history[0].is_html);
    }

    #[tokio::test]
    async fn test_invalid_email_writes_nothing() {
        let dir = tempdir().unwrap();
        let outbox = OutboxSender::new(dir.path());

        let result = outbox.send(OutgoingEmail::html("not-an-address", "News", "body")).await;
        assert!(matches!(result, Err(MailError::InvalidRecipient(_))));
        assert!(outbox.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let dir = tempdir().unwrap();
        let outbox = OutboxSender::new(dir.path());

        outbox.send(OutgoingEmail::html("a@example.com", "first", "x")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        outbox.send(OutgoingEmail::html("a@example.com", "second", "x")).await.unwrap();

        let subjects: Vec<_> = outbox.history().await.unwrap().into_iter().map(|m| m.subject).collect();
        assert_eq!(subjects, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_unknown_status_is_skipped() {
        let dir = tempdir().unwrap();
        let outbox = OutboxSender::new(dir.path());
        outbox.send(OutgoingEmail::html("a@example.com", "kept", "x")).await.unwrap();

        let mut record = serde_json::to_value(&outbox.history().await.unwrap()[0]).unwrap();
        assert_eq!(record["status"], "sent");
        record["id"] = serde_json::json!(Uuid::new_v4());
        record["status"] = serde_json::json!("failed");
        std::fs::write(dir.path().join("bad.json"), record.to_string()).unwrap();

        let history = outbox.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].subject, "kept");
    }

    #[tokio::test]
    async fn test_history_of_missing_outbox_is_empty() {
        let dir = tempdir().unwrap();
        let outbox = OutboxSender::new(dir.path().join("nothing-here"));
        assert!(outbox.history().await.unwrap().is_empty());
    }
}

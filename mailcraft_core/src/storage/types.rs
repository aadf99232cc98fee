use crate::document::DocumentSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a saved template
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub Uuid);

impl TemplateId {
    pub fn generate() -> Self {
        TemplateId(Uuid::new_v4())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TemplateId {
    fn from(uuid: Uuid) -> Self {
        TemplateId(uuid)
    }
}

impl From<TemplateId> for Uuid {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

impl FromStr for TemplateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(TemplateId)
    }
}

/// What the builder hands to a store when saving
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDraft {
    pub user_id: String,
    pub name: String,
    /// Export markup at the time of saving
    pub html_content: String,
    pub json_structure: DocumentSnapshot,
}

/// A template as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: TemplateId,
    pub user_id: String,
    pub name: String,
    pub html_content: String,
    pub json_structure: DocumentSnapshot,
    pub created_at: DateTime<Utc>,
}

impl StoredTemplate {
    pub fn from_draft(draft: TemplateDraft) -> Self {
        Self {
            id: TemplateId::generate(),
            user_id: draft.user_id,
            name: draft.name,
            html_content: draft.html_content,
            json_structure: draft.json_structure,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// One row of a template listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for TemplateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}  {}", self.id, self.created_at.format("%Y-%m-%d %H:%M"), self.name)
    }
}

/// Newest first; ties broken by id so listings are stable
pub(crate) fn sort_newest_first(summaries: &mut [TemplateSummary]) {
    summaries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.0.cmp(&b.id.0))
    });
}

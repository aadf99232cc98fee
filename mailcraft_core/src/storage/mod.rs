//! Template persistence. The builder only depends on [`TemplateStore`];
//! which technology sits behind it is the host's choice.

mod error;
mod file;
mod memory;
mod types;

pub use error::{Result, StorageError};
pub use file::FileTemplateStore;
pub use memory::InMemoryTemplateStore;
pub use types::{StoredTemplate, TemplateDraft, TemplateId, TemplateSummary};

use async_trait::async_trait;

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Persist a new template and return its id
    async fn save(&self, draft: TemplateDraft) -> Result<TemplateId>;

    async fn load(&self, id: &TemplateId) -> Result<StoredTemplate>;

    /// Templates owned by `user_id`, newest first
    async fn list(&self, user_id: &str) -> Result<Vec<TemplateSummary>>;

    async fn delete(&self, id: &TemplateId) -> Result<()>;
}

/// Checks shared by every store before anything is written
pub(crate) fn check_draft(draft: &TemplateDraft) -> Result<()> {
    if draft.user_id.trim().is_empty() {
        return Err(StorageError::MissingField("owner"));
    }
    if draft.name.trim().is_empty() {
        return Err(StorageError::MissingField("name"));
    }
    Ok(())
}

use super::types::{sort_newest_first, StoredTemplate, TemplateDraft, TemplateId, TemplateSummary};
use super::{check_draft, Result, StorageError, TemplateStore};
use crate::collections::Pile;
use async_trait::async_trait;
use std::sync::RwLock;
use tracing::debug;

/// Process-local store, mainly for tests and previews
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: RwLock<Pile<TemplateId, StoredTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.templates.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::LockPoisoned("store")
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn save(&self, draft: TemplateDraft) -> Result<TemplateId> {
        check_draft(&draft)?;
        let template = StoredTemplate::from_draft(draft);
        let id = template.id;
        self.templates.write().map_err(poisoned)?.insert(id, template);
        debug!(template_id = %id, "template stored in memory");
        Ok(id)
    }

    async fn load(&self, id: &TemplateId) -> Result<StoredTemplate> {
        self.templates
            .read()
            .map_err(poisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(*id))
    }

    async fn list(&self, user_id: &str) -> Result<Vec<TemplateSummary>> {
        let templates = self.templates.read().map_err(poisoned)?;
        let mut summaries: Vec<_> = templates
            .filter(|t| t.user_id == user_id)
            .into_iter()
            .map(StoredTemplate::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, id: &TemplateId) -> Result<()> {
        self.templates
            .write()
            .map_err(poisoned)?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(*id))
    }
}

use super::types::{sort_newest_first, StoredTemplate, TemplateDraft, TemplateId, TemplateSummary};
use super::{check_draft, Result, StorageError, TemplateStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::fs;
use tracing::{debug, error, info, warn};

/// One pretty-printed JSON file per template, named by id, with an
/// in-memory cache of everything read or written
#[derive(Debug)]
pub struct FileTemplateStore {
    base_path: PathBuf,
    cache: RwLock<HashMap<TemplateId, StoredTemplate>>,
}

impl FileTemplateStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base_path = base_path.as_ref().to_path_buf();
        debug!("Creating FileTemplateStore with base path: {:?}", base_path);
        Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn template_path(&self, id: &TemplateId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    fn cached(&self, id: &TemplateId) -> Result<Option<StoredTemplate>> {
        let cache = self
            .cache
            .read()
            .map_err(|_| StorageError::LockPoisoned("cache"))?;
        Ok(cache.get(id).cloned())
    }

    fn remember(&self, template: StoredTemplate) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::LockPoisoned("cache"))?;
        cache.insert(template.id, template);
        Ok(())
    }

    fn forget(&self, id: &TemplateId) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| StorageError::LockPoisoned("cache"))?;
        cache.remove(id);
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<StoredTemplate> {
        let json = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[async_trait]
impl TemplateStore for FileTemplateStore {
    async fn save(&self, draft: TemplateDraft) -> Result<TemplateId> {
        check_draft(&draft)?;
        let template = StoredTemplate::from_draft(draft);
        let path = self.template_path(&template.id);

        fs::create_dir_all(&self.base_path).await?;
        let json = serde_json::to_string_pretty(&template)?;
        fs::write(&path, json).await.map_err(|e| {
            error!("Failed to write template file {:?}: {}", path, e);
            StorageError::Io(e)
        })?;

        info!(template_id = %template.id, name = %template.name, "template saved");
        let id = template.id;
        self.remember(template)?;
        Ok(id)
    }

    async fn load(&self, id: &TemplateId) -> Result<StoredTemplate> {
        if let Some(template) = self.cached(id)? {
            debug!("Found template {} in cache", id);
            return Ok(template);
        }

        let path = self.template_path(id);
        let template = match self.read_file(&path).await {
            Ok(template) => template,
            Err(StorageError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(*id));
            }
            Err(e) => {
                error!("Failed to read template {:?}: {}", path, e);
                return Err(e);
            }
        };
        if template.id != *id {
            return Err(StorageError::Mismatched {
                path,
                expected: *id,
                found: template.id,
            });
        }

        debug!("Loaded template {} from disk", id);
        self.remember(template.clone())?;
        Ok(template)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<TemplateSummary>> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            match self.read_file(&path).await {
                Ok(template) if template.user_id == user_id => summaries.push(template.summary()),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable template file {:?}: {}", path, e),
            }
        }

        sort_newest_first(&mut summaries);
        debug!("Found {} templates for user {}", summaries.len(), user_id);
        Ok(summaries)
    }

    async fn delete(&self, id: &TemplateId) -> Result<()> {
        let path = self.template_path(id);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.forget(id)?;
                return Err(StorageError::NotFound(*id));
            }
            Err(e) => return Err(e.into()),
        }
        self.forget(id)?;
        info!(template_id = %id, "template deleted");
        Ok(())
    }
}

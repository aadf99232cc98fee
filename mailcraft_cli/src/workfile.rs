//! The on-disk working copy the CLI edits between invocations: the document
//! plus the bits of session state a browser tab would keep in memory.

use anyhow::{Context, Result};
use mailcraft_core::{Builder, BuilderConfig, DocumentSnapshot, ElementId, TemplateId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingFile {
    #[serde(flatten)]
    pub document: DocumentSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
}

impl WorkingFile {
    /// Read the working file, or start empty when it does not exist yet
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Working file {:?} not found, starting empty", path);
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        debug!("Saved working file {:?}", path);
        Ok(())
    }

    /// Open a builder session on this working copy
    pub fn into_builder(self, config: BuilderConfig) -> Builder {
        let mut builder = Builder::new(config);
        builder.load(self.document, self.template_id);
        if self.selected.is_some() {
            builder.select(self.selected);
        }
        builder
    }

    pub fn from_builder(builder: &Builder) -> Self {
        Self {
            document: builder.snapshot(),
            selected: builder.selected().cloned(),
            template_id: builder.current_template().copied(),
        }
    }
}

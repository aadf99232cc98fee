use crate::render::{ExportRenderer, InteractiveRenderer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Width of the centred content column in pixels
    pub width: u32,
    /// `<title>` of exported documents
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 600,
            title: "Email".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Deepest group nesting either renderer will walk; unlimited when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    pub empty_canvas_message: String,
    pub empty_group_message: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let interactive = InteractiveRenderer::default();
        Self {
            max_depth: None,
            empty_canvas_message: interactive.empty_canvas_message,
            empty_group_message: interactive.empty_group_message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub capacity: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub templates_dir: PathBuf,
    pub outbox_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            outbox_dir: PathBuf::from("outbox"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Owner recorded on saved templates
    pub user_id: Option<String>,
}

/// Settings for a builder session, read from a TOML file. Every key is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub export: ExportConfig,
    pub render: RenderConfig,
    pub journal: JournalConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

impl BuilderConfig {
    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BuilderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.export.width == 0 {
            return Err(ConfigError::Invalid("export.width must be greater than zero".to_string()));
        }
        if self.render.max_depth == Some(0) {
            return Err(ConfigError::Invalid("render.max_depth must be greater than zero".to_string()));
        }
        if self.journal.capacity == 0 {
            return Err(ConfigError::Invalid("journal.capacity must be greater than zero".to_string()));
        }
        if let Some(user) = &self.session.user_id {
            if user.trim().is_empty() {
                return Err(ConfigError::Invalid("session.user_id cannot be blank".to_string()));
            }
        }
        Ok(())
    }

    pub fn export_renderer(&self) -> ExportRenderer {
        ExportRenderer::new(self.export.width, self.export.title.clone(), self.render.max_depth)
    }

    pub fn interactive_renderer(&self) -> InteractiveRenderer {
        InteractiveRenderer {
            max_depth: self.render.max_depth,
            empty_canvas_message: self.render.empty_canvas_message.clone(),
            empty_group_message: self.render.empty_group_message.clone(),
        }
    }
}

pub mod builder;
pub mod collections;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod journal;
pub mod mail;
pub mod render;
pub mod schema;
pub mod storage;

pub use builder::Builder;
pub use collections::{Pile, Progression};
pub use config::{BuilderConfig, ConfigError};
pub use document::{Document, DocumentSnapshot};
pub use element::{Element, ElementId, ElementKind, PropertyValue};
pub use error::{BuilderError, RenderError, Result};
pub use journal::{BuilderEvent, EventJournal};
pub use mail::{MailError, MailSender, OutboxSender, OutgoingEmail};
pub use render::{render_export, render_interactive, render_panel, DropTarget, PropertyPanel, ViewTree};
pub use storage::{FileTemplateStore, InMemoryTemplateStore, StorageError, TemplateId, TemplateStore};

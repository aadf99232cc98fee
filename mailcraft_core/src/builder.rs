//! The builder session: one document plus everything the editor tracks
//! around it. Every mutation goes through here, is journaled, and leaves the
//! canvas view and property panel re-rendered before it returns.

use crate::config::BuilderConfig;
use crate::document::{Document, DocumentSnapshot};
use crate::element::{ElementId, ElementKind, PropertyValue};
use crate::error::{BuilderError, RenderError, Result};
use crate::journal::{BuilderEvent, EventJournal};
use crate::mail::{MailSender, OutgoingEmail, SendReceipt};
use crate::render::{
    render_panel, DropTarget, ExportRenderer, FieldInput, InteractiveRenderer, PropertyPanel, ViewTree,
};
use crate::storage::{TemplateDraft, TemplateId, TemplateStore, TemplateSummary};
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub struct Builder {
    document: Document,
    selected: Option<ElementId>,
    dragging: Option<ElementKind>,
    current_template: Option<TemplateId>,
    journal: EventJournal,
    config: BuilderConfig,
    interactive: InteractiveRenderer,
    exporter: ExportRenderer,
    view: std::result::Result<ViewTree, RenderError>,
    panel: PropertyPanel,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl Builder {
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_document(config, Document::new())
    }

    /// Start a session on an existing document
    pub fn with_document(config: BuilderConfig, document: Document) -> Self {
        let interactive = config.interactive_renderer();
        let exporter = config.export_renderer();
        let view = interactive.render(&document, None);
        let panel = render_panel(&document, None);
        Self {
            document,
            selected: None,
            dragging: None,
            current_template: None,
            journal: EventJournal::new(config.journal.capacity),
            config,
            interactive,
            exporter,
            view,
            panel,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The selected id, which may refer to an element that no longer exists
    pub fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub fn dragging(&self) -> Option<ElementKind> {
        self.dragging
    }

    pub fn current_template(&self) -> Option<&TemplateId> {
        self.current_template.as_ref()
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The canvas as of the last mutation
    pub fn view(&self) -> std::result::Result<&ViewTree, &RenderError> {
        self.view.as_ref()
    }

    /// The property panel as of the last mutation
    pub fn panel(&self) -> &PropertyPanel {
        &self.panel
    }

    fn refresh(&mut self) {
        self.view = self.interactive.render(&self.document, self.selected.as_ref());
        if let Err(e) = &self.view {
            error!("Canvas could not be rendered: {}", e);
        }
        self.panel = render_panel(&self.document, self.selected.as_ref());
    }

    fn log(&mut self, event: BuilderEvent) {
        let record = self.journal.append(event);
        debug!(revision = record.metadata.revision, "{}", record.event);
    }

    fn record(&mut self, event: BuilderEvent) {
        self.log(event);
        self.refresh();
    }

    /// Add a new element of `kind` and select it. A parent that is missing or
    /// not a group places the element at the top level instead.
    pub fn insert(&mut self, kind: ElementKind, parent_id: Option<&ElementId>) -> ElementId {
        let id = self.document.insert(kind, parent_id);
        let parent_id = self.document.get(&id).and_then(|e| e.parent_id.clone());
        self.selected = Some(id.clone());
        self.log(BuilderEvent::Inserted {
            element_id: id.clone(),
            kind,
            parent_id,
        });
        self.record(BuilderEvent::Selected {
            element_id: Some(id.clone()),
        });
        id
    }

    /// Change the selection. The id is not checked; the renderers treat an
    /// unknown id as no selection.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id.clone();
        self.record(BuilderEvent::Selected { element_id: id });
    }

    /// Delete an element and everything inside it. Returns the removed ids.
    pub fn delete(&mut self, id: &ElementId) -> Vec<ElementId> {
        let removed = self.document.remove(id);
        if removed.is_empty() {
            debug!(element_id = %id, "delete of unknown element ignored");
            return removed;
        }
        if self.selected.as_ref().map(|s| removed.contains(s)).unwrap_or(false) {
            self.selected = None;
        }
        info!(element_id = %id, removed = removed.len(), "element deleted");
        self.record(BuilderEvent::Deleted {
            element_ids: removed.clone(),
        });
        removed
    }

    pub fn delete_selected(&mut self) -> Vec<ElementId> {
        match self.selected.clone() {
            Some(id) => self.delete(&id),
            None => Vec::new(),
        }
    }

    /// Replace one property value on one element
    pub fn update_property(&mut self, id: &ElementId, name: &str, value: impl Into<PropertyValue>) -> Result<()> {
        self.document.set_property(id, name, value.into()).map_err(|e| {
            warn!(element_id = %id, property = name, "property update rejected: {}", e);
            e
        })?;
        self.record(BuilderEvent::PropertyUpdated {
            element_id: id.clone(),
            property: name.to_string(),
        });
        Ok(())
    }

    /// Write back one edited panel field onto the selected element
    pub fn edit_field(&mut self, name: &str, input: FieldInput) -> Result<()> {
        match self.selected.clone() {
            Some(id) => self.update_property(&id, name, input),
            None => {
                debug!(property = name, "field edit with nothing selected ignored");
                Ok(())
            }
        }
    }

    /// Remove every element after `confirm` agrees. Returns whether the
    /// canvas was cleared.
    pub fn clear<F>(&mut self, confirm: F) -> bool
    where
        F: FnOnce(usize) -> bool,
    {
        if !confirm(self.document.len()) {
            debug!("clear declined");
            return false;
        }
        self.reset();
        true
    }

    fn reset(&mut self) {
        let removed = self.document.len();
        self.document.clear();
        self.selected = None;
        self.current_template = None;
        info!(removed, "canvas cleared");
        self.record(BuilderEvent::Cleared { removed });
    }

    /// Pick up a palette item
    pub fn begin_drag(&mut self, kind: ElementKind) {
        debug!(kind = %kind, "drag started");
        self.dragging = Some(kind);
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    /// Drop the dragged palette item. Without an active drag nothing happens.
    pub fn drop_onto(&mut self, target: &DropTarget) -> Option<ElementId> {
        let kind = self.dragging.take()?;
        Some(self.insert(kind, target.parent_id()))
    }

    /// Replace the whole document, e.g. with a stored template
    pub fn load(&mut self, snapshot: DocumentSnapshot, template_id: Option<TemplateId>) {
        self.document = Document::from_snapshot(snapshot);
        self.selected = None;
        self.dragging = None;
        self.current_template = template_id;
        let elements = self.document.len();
        info!(elements, template_id = ?template_id, "document loaded");
        self.record(BuilderEvent::Loaded {
            template_id,
            elements,
        });
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.document.snapshot()
    }

    /// Render the canvas afresh
    pub fn render_interactive(&self) -> Result<ViewTree> {
        Ok(self.interactive.render(&self.document, self.selected.as_ref())?)
    }

    pub fn render_export(&self) -> Result<String> {
        Ok(self.exporter.render(&self.document)?)
    }

    fn user_id(&self) -> Result<&str> {
        self.config
            .session
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .ok_or(BuilderError::MissingUser)
    }

    /// Save the current document under `name`. The document itself is never
    /// touched, whatever the store does.
    pub async fn save_template(&mut self, store: &dyn TemplateStore, name: &str) -> Result<TemplateId> {
        let user_id = self.user_id()?.to_string();
        let name = name.trim();
        if name.is_empty() {
            return Err(BuilderError::MissingTemplateName);
        }

        let draft = TemplateDraft {
            user_id,
            name: name.to_string(),
            html_content: self.render_export()?,
            json_structure: self.snapshot(),
        };
        let id = store.save(draft).await.map_err(|e| {
            error!("Failed to save template {:?}: {}", name, e);
            e
        })?;

        self.current_template = Some(id);
        self.record(BuilderEvent::TemplateSaved {
            template_id: id,
            name: name.to_string(),
        });
        Ok(id)
    }

    /// Replace the document with a stored template. A failing store leaves
    /// the current document as it was.
    pub async fn load_template(&mut self, store: &dyn TemplateStore, id: &TemplateId) -> Result<()> {
        let template = store.load(id).await?;
        self.load(template.json_structure, Some(template.id));
        Ok(())
    }

    pub async fn list_templates(&self, store: &dyn TemplateStore) -> Result<Vec<TemplateSummary>> {
        let user_id = self.user_id()?;
        Ok(store.list(user_id).await?)
    }

    /// Delete a stored template after `confirm` agrees. The canvas is
    /// cleared when the deleted template is the one being edited.
    pub async fn delete_template<F>(&mut self, store: &dyn TemplateStore, id: &TemplateId, confirm: F) -> Result<bool>
    where
        F: FnOnce(&TemplateId) -> bool,
    {
        if !confirm(id) {
            return Ok(false);
        }
        store.delete(id).await?;
        self.record(BuilderEvent::TemplateDeleted { template_id: *id });
        if self.current_template.as_ref() == Some(id) {
            self.reset();
        }
        Ok(true)
    }

    /// An HTML email whose body is the exported document
    pub fn compose_email(&self, to: &str, subject: &str) -> Result<OutgoingEmail> {
        let email = OutgoingEmail::html(to.trim(), subject.trim(), self.render_export()?);
        email.validate()?;
        Ok(email)
    }

    pub async fn send_email(&self, sender: &dyn MailSender, to: &str, subject: &str) -> Result<SendReceipt> {
        let email = self.compose_email(to, subject)?;
        Ok(sender.send(email).await?)
    }
}

#[cfg(test)]
mod tests;

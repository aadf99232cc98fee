use super::*;
use crate::config::SessionConfig;
use crate::render::{ElementBody, PanelAction};
use crate::storage::{InMemoryTemplateStore, StorageError, StoredTemplate};
use async_trait::async_trait;

fn signed_in() -> Builder {
    let mut config = BuilderConfig::default();
    config.session = SessionConfig {
        user_id: Some("user-1".to_string()),
    };
    Builder::new(config)
}

/// A store whose every call fails
struct BrokenStore;

#[async_trait]
impl TemplateStore for BrokenStore {
    async fn save(&self, _draft: TemplateDraft) -> crate::storage::Result<TemplateId> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into())
    }

    async fn load(&self, id: &TemplateId) -> crate::storage::Result<StoredTemplate> {
        Err(StorageError::NotFound(*id))
    }

    async fn list(&self, _user_id: &str) -> crate::storage::Result<Vec<TemplateSummary>> {
        Err(StorageError::LockPoisoned("store"))
    }

    async fn delete(&self, id: &TemplateId) -> crate::storage::Result<()> {
        Err(StorageError::NotFound(*id))
    }
}

#[test]
fn test_new_builder_shows_empty_canvas() {
    let builder = Builder::default();
    assert!(builder.view().unwrap().is_empty());
    assert!(builder.panel().form().is_none());
    assert!(builder.journal().is_empty());
}

#[test]
fn test_views_refresh_after_each_mutation() {
    let mut builder = Builder::default();
    let id = builder.insert(ElementKind::Text, None);
    assert!(builder.view().unwrap().find(&id).is_some());

    builder.select(Some(id.clone()));
    let form = builder.panel().form().unwrap();
    assert_eq!(form.element_id, id);
    assert_eq!(form.actions, vec![PanelAction::Delete(id.clone())]);

    builder.update_property(&id, "content", "Hello").unwrap();
    match &builder.view().unwrap().find(&id).unwrap().body {
        ElementBody::Text { content, .. } => assert_eq!(content, "Hello"),
        other => panic!("unexpected body {:?}", other),
    }
}

#[test]
fn test_insert_selects_new_element() {
    let mut builder = Builder::default();
    let group = builder.insert(ElementKind::Group, None);
    let text = builder.insert(ElementKind::Text, Some(&group));

    assert_eq!(builder.selected(), Some(&text));
    assert_eq!(builder.panel().form().unwrap().element_id, text);
    assert_eq!(builder.view().unwrap().selected().unwrap().id, text);

    let events: Vec<_> = builder.journal().iter().map(|r| r.event.clone()).collect();
    assert_eq!(
        events[2..],
        [
            BuilderEvent::Inserted {
                element_id: text.clone(),
                kind: ElementKind::Text,
                parent_id: Some(group),
            },
            BuilderEvent::Selected {
                element_id: Some(text.clone()),
            },
        ]
    );

    builder.begin_drag(ElementKind::Image);
    let image = builder.drop_onto(&DropTarget::Root).unwrap();
    assert_eq!(builder.selected(), Some(&image));
    assert_eq!(builder.panel().form().unwrap().kind, ElementKind::Image);
}

#[test]
fn test_delete_clears_selection_inside_removed_subtree() {
    let mut builder = Builder::default();
    let group = builder.insert(ElementKind::Group, None);
    let child = builder.insert(ElementKind::Text, Some(&group));
    builder.select(Some(child.clone()));

    let removed = builder.delete(&group);

    assert_eq!(removed, vec![child, group]);
    assert!(builder.selected().is_none());
    assert!(builder.document().is_empty());
    assert!(builder.view().unwrap().is_empty());
}

#[test]
fn test_delete_selected_without_selection_is_a_no_op() {
    let mut builder = Builder::default();
    builder.insert(ElementKind::Button, None);
    builder.select(None);
    let revision = builder.journal().revision();

    assert!(builder.delete_selected().is_empty());
    assert_eq!(builder.document().len(), 1);
    assert_eq!(builder.journal().revision(), revision);
}

#[test]
fn test_stale_selection_is_tolerated() {
    let mut builder = Builder::default();
    builder.select(Some(ElementId::from("el_ghost")));
    assert!(builder.panel().form().is_none());
    assert!(builder.view().unwrap().selected().is_none());
}

#[test]
fn test_rejected_update_changes_nothing() {
    let mut builder = Builder::default();
    let id = builder.insert(ElementKind::Image, None);
    let before = builder.snapshot();
    let revision = builder.journal().revision();

    let err = builder.update_property(&id, "fontSize", "20px").unwrap_err();
    assert!(matches!(err, BuilderError::UnknownProperty { .. }));
    assert_eq!(builder.snapshot(), before);
    assert_eq!(builder.journal().revision(), revision);
}

#[test]
fn test_edit_field_writes_to_selection() {
    let mut builder = Builder::default();
    let id = builder.insert(ElementKind::Text, None);

    builder.select(None);
    builder.edit_field("bold", FieldInput::Checked(true)).unwrap();
    assert!(!builder.document().get(&id).unwrap().properties.flag("bold"));

    // inserting selected it; edits land on it once it is selected again
    builder.select(Some(id.clone()));
    builder.edit_field("bold", FieldInput::Checked(true)).unwrap();
    builder.edit_field("color", FieldInput::Text("#123456".to_string())).unwrap();

    let element = builder.document().get(&id).unwrap();
    assert!(element.properties.flag("bold"));
    assert_eq!(element.properties.text("color"), Some("#123456"));
}

#[test]
fn test_clear_respects_confirmation() {
    let mut builder = Builder::default();
    builder.insert(ElementKind::Text, None);
    builder.insert(ElementKind::Image, None);

    let mut asked = 0;
    assert!(!builder.clear(|count| {
        asked = count;
        false
    }));
    assert_eq!(asked, 2);
    assert_eq!(builder.document().len(), 2);

    assert!(builder.clear(|_| true));
    assert!(builder.document().is_empty());
    assert!(builder.view().unwrap().is_empty());
    assert_eq!(
        builder.journal().last().map(|r| r.event.clone()),
        Some(BuilderEvent::Cleared { removed: 2 })
    );
}

#[test]
fn test_drag_and_drop_protocol() {
    let mut builder = Builder::default();
    assert!(builder.drop_onto(&DropTarget::Root).is_none());

    builder.begin_drag(ElementKind::Group);
    let group = builder.drop_onto(&DropTarget::Root).unwrap();
    assert!(builder.dragging().is_none());

    builder.begin_drag(ElementKind::Button);
    let button = builder.drop_onto(&DropTarget::Group(group.clone())).unwrap();
    assert_eq!(builder.document().get(&group).unwrap().child_ids(), &[button.clone()]);

    // dropping onto a non-group lands at the top level
    builder.begin_drag(ElementKind::Text);
    let text = builder.drop_onto(&DropTarget::Group(button)).unwrap();
    assert!(builder.document().get(&text).unwrap().is_root());

    builder.begin_drag(ElementKind::Image);
    builder.cancel_drag();
    assert!(builder.drop_onto(&DropTarget::Root).is_none());
    assert_eq!(builder.document().len(), 3);
}

#[test]
fn test_drop_resolved_from_view_tree() {
    let mut builder = Builder::default();
    let outer = builder.insert(ElementKind::Group, None);
    let inner = builder.insert(ElementKind::Group, Some(&outer));
    let text = builder.insert(ElementKind::Text, Some(&inner));

    let target = builder.view().unwrap().drop_target(&[outer, inner.clone(), text]);
    builder.begin_drag(ElementKind::Image);
    let image = builder.drop_onto(&target).unwrap();

    assert_eq!(builder.document().get(&image).unwrap().parent_id, Some(inner));
}

#[test]
fn test_load_replaces_document_and_selection() {
    let mut source = Builder::default();
    let group = source.insert(ElementKind::Group, None);
    source.insert(ElementKind::Text, Some(&group));
    let snapshot = source.snapshot();

    let mut builder = Builder::default();
    let old = builder.insert(ElementKind::Button, None);
    builder.select(Some(old.clone()));
    builder.load(snapshot.clone(), None);

    assert!(builder.selected().is_none());
    assert!(!builder.document().contains(&old));
    assert_eq!(builder.snapshot(), snapshot);
}

#[test]
fn test_render_error_is_kept_not_raised() {
    let json = serde_json::json!({
        "elements": [
            { "id": "el_a", "type": "group", "props": { "children": ["el_a"] }, "parentId": null }
        ]
    });
    let snapshot: DocumentSnapshot = serde_json::from_value(json).unwrap();
    let mut builder = Builder::default();
    builder.load(snapshot, None);

    assert!(builder.view().is_err());
    assert!(matches!(builder.render_export(), Err(BuilderError::Render(_))));
}

#[tokio::test]
async fn test_save_requires_user_and_name() {
    let store = InMemoryTemplateStore::new();

    let mut anonymous = Builder::default();
    assert!(matches!(
        anonymous.save_template(&store, "Welcome").await,
        Err(BuilderError::MissingUser)
    ));

    let mut builder = signed_in();
    assert!(matches!(
        builder.save_template(&store, "   ").await,
        Err(BuilderError::MissingTemplateName)
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_save_and_load_template() {
    let store = InMemoryTemplateStore::new();
    let mut builder = signed_in();
    let text = builder.insert(ElementKind::Text, None);
    builder.update_property(&text, "content", "Hello").unwrap();

    let id = builder.save_template(&store, "  Welcome ").await.unwrap();
    assert_eq!(builder.current_template(), Some(&id));

    let stored = store.load(&id).await.unwrap();
    assert_eq!(stored.name, "Welcome");
    assert!(stored.html_content.contains("Hello"));

    let mut other = signed_in();
    other.load_template(&store, &id).await.unwrap();
    assert_eq!(other.snapshot(), builder.snapshot());
    assert_eq!(other.current_template(), Some(&id));

    let listed = other.list_templates(&store).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
}

#[tokio::test]
async fn test_failing_store_leaves_document_untouched() {
    let mut builder = signed_in();
    let id = builder.insert(ElementKind::Group, None);
    builder.insert(ElementKind::Text, Some(&id));
    builder.select(Some(id.clone()));
    let before = builder.snapshot();

    assert!(matches!(
        builder.save_template(&BrokenStore, "Welcome").await,
        Err(BuilderError::Storage(_))
    ));
    assert!(builder
        .load_template(&BrokenStore, &TemplateId::generate())
        .await
        .is_err());

    assert_eq!(builder.snapshot(), before);
    assert_eq!(builder.selected(), Some(&id));
    assert!(builder.current_template().is_none());
}

#[tokio::test]
async fn test_deleting_loaded_template_clears_canvas() {
    let store = InMemoryTemplateStore::new();
    let mut builder = signed_in();
    builder.insert(ElementKind::Text, None);
    let loaded = builder.save_template(&store, "Current").await.unwrap();
    let other = builder.save_template(&store, "Other").await.unwrap();
    builder.load_template(&store, &loaded).await.unwrap();

    // declined
    assert!(!builder.delete_template(&store, &other, |_| false).await.unwrap());
    assert_eq!(store.len(), 2);

    // a different template leaves the canvas alone
    assert!(builder.delete_template(&store, &other, |_| true).await.unwrap());
    assert_eq!(builder.document().len(), 1);

    assert!(builder.delete_template(&store, &loaded, |_| true).await.unwrap());
    assert!(builder.document().is_empty());
    assert!(builder.current_template().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_compose_email_uses_export_markup() {
    let mut builder = Builder::default();
    let id = builder.insert(ElementKind::Text, None);
    builder.update_property(&id, "content", "Hello").unwrap();

    let email = builder.compose_email(" reader@example.com ", "Newsletter").unwrap();
    assert_eq!(email.to, "reader@example.com");
    assert!(email.is_html);
    assert_eq!(email.body, builder.render_export().unwrap());

    assert!(matches!(
        builder.compose_email("reader@example.com", ""),
        Err(BuilderError::Mail(_))
    ));
}

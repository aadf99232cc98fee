use super::*;
use serde_json::json;

#[test]
fn test_element_creation() {
    let elem = Element::new(ElementKind::Text, None);
    assert!(elem.id.as_str().starts_with("el_"));
    assert_eq!(elem.kind, ElementKind::Text);
    assert!(elem.is_root());
    assert_eq!(elem.properties.text("content"), Some("Enter your text here"));
    assert_eq!(elem.properties.text("fontSize"), Some("14px"));
    assert!(!elem.properties.flag("bold"));
}

#[test]
fn test_element_ids_are_unique() {
    let a = Element::new(ElementKind::Text, None);
    let b = Element::new(ElementKind::Text, None);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_default_properties_are_independent_copies() {
    let mut first = Element::new(ElementKind::Group, None);
    let second = Element::new(ElementKind::Group, None);

    first
        .properties
        .children_mut()
        .unwrap()
        .push(ElementId::from("el_child"));

    assert_eq!(first.child_ids().len(), 1);
    assert!(second.child_ids().is_empty());
    assert!(ElementKind::Group.default_properties().children().unwrap().is_empty());
}

#[test]
fn test_only_groups_have_children() {
    for kind in ElementKind::ALL {
        let elem = Element::new(kind, None);
        assert_eq!(elem.properties.contains(CHILDREN), kind == ElementKind::Group);
    }
}

#[test]
fn test_element_serialization_shape() {
    let mut group = Element::new(ElementKind::Group, None);
    group
        .properties
        .children_mut()
        .unwrap()
        .push(ElementId::from("el_a"));

    let value = serde_json::to_value(&group).unwrap();
    assert_eq!(value["type"], "group");
    assert_eq!(value["props"]["layout"], "column");
    assert_eq!(value["props"]["children"], json!(["el_a"]));
    assert_eq!(value["parentId"], serde_json::Value::Null);

    let back: Element = serde_json::from_value(value).unwrap();
    assert_eq!(back, group);
}

#[test]
fn test_element_deserializes_saved_template_shape() {
    let value = json!({
        "id": "el_k2j4h5g6f",
        "type": "text",
        "props": {
            "content": "Hi",
            "bold": true,
            "italic": false,
            "fontSize": "18px"
        },
        "parentId": "el_parent01"
    });

    let elem: Element = serde_json::from_value(value).unwrap();
    assert_eq!(elem.id.as_str(), "el_k2j4h5g6f");
    assert_eq!(elem.parent_id, Some(ElementId::from("el_parent01")));
    assert!(elem.properties.flag("bold"));
    assert_eq!(elem.properties.text("content"), Some("Hi"));
}

#[test]
fn test_flag_coercion() {
    assert_eq!(PropertyValue::from("on").as_flag(), Some(true));
    assert_eq!(PropertyValue::from("FALSE").as_flag(), Some(false));
    assert_eq!(PropertyValue::from("maybe").as_flag(), None);
    assert_eq!(PropertyValue::from(true).as_flag(), Some(true));
}

#[test]
fn test_normalize() {
    let mut text = Element::new(ElementKind::Text, None);
    text.properties.set(
        CHILDREN,
        PropertyValue::Children(Progression::new()),
    );
    assert!(text.normalize());
    assert!(!text.properties.contains(CHILDREN));

    let mut group = Element::new(ElementKind::Group, None);
    group.properties.remove(CHILDREN);
    assert!(group.normalize());
    assert!(group.child_ids().is_empty());
    assert!(!group.normalize());
}

#[test]
fn test_kind_parsing() {
    assert_eq!("Text".parse::<ElementKind>().unwrap(), ElementKind::Text);
    assert_eq!(" group ".parse::<ElementKind>().unwrap(), ElementKind::Group);
    assert!("video".parse::<ElementKind>().is_err());
}

use super::*;
use crate::element::{ElementId, ElementKind};

fn inserted(id: &str) -> BuilderEvent {
    BuilderEvent::Inserted {
        element_id: ElementId::from(id),
        kind: ElementKind::Text,
        parent_id: None,
    }
}

#[test]
fn test_journal_is_bounded() {
    let mut journal = EventJournal::new(3);
    for i in 0..5 {
        journal.append(inserted(&format!("el_{}", i)));
    }

    assert_eq!(journal.len(), 3);
    let first = journal.iter().next().unwrap();
    assert_eq!(first.event, inserted("el_2"));
    assert_eq!(journal.last().unwrap().event, inserted("el_4"));
    assert_eq!(journal.revision(), 5);
}

#[test]
fn test_selection_does_not_bump_revision() {
    let mut journal = EventJournal::default();
    journal.append(inserted("el_a"));
    let record = journal.append(BuilderEvent::Selected {
        element_id: Some(ElementId::from("el_a")),
    });

    assert_eq!(record.metadata.revision, 1);
    assert_eq!(journal.revision(), 1);
}

#[test]
fn test_event_ids_are_unique() {
    let mut journal = EventJournal::new(8);
    journal.append(inserted("el_a"));
    journal.append(inserted("el_b"));

    let all = journal.all();
    assert_ne!(all[0].metadata.event_id, all[1].metadata.event_id);
    assert!(all[0].metadata.timestamp <= all[1].metadata.timestamp);
}

#[test]
fn test_zero_capacity_keeps_latest() {
    let mut journal = EventJournal::new(0);
    journal.append(inserted("el_a"));
    journal.append(inserted("el_b"));
    assert_eq!(journal.capacity(), 1);
    assert_eq!(journal.all().len(), 1);
}

#[test]
fn test_record_display() {
    let mut journal = EventJournal::new(4);
    let line = journal
        .append(BuilderEvent::Deleted {
            element_ids: vec![ElementId::from("el_a"), ElementId::from("el_b")],
        })
        .to_string();
    assert!(line.ends_with("r1 deleted 2 element(s)"), "{}", line);
}

#[test]
fn test_event_serialization_is_tagged() {
    let value = serde_json::to_value(BuilderEvent::Cleared { removed: 3 }).unwrap();
    assert_eq!(value["type"], "cleared");
    assert_eq!(value["removed"], 3);
}

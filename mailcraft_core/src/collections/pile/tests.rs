use super::*;

#[test]
fn test_pile_insert_retrieve() {
    let mut pile = Pile::new();
    pile.insert("a", "test_data".to_string());
    assert_eq!(pile.get(&"a"), Some(&"test_data".to_string()));
    assert!(pile.get(&"b").is_none());
}

#[test]
fn test_pile_ordered_access() {
    let mut pile = Pile::new();
    pile.insert(3, "first");
    pile.insert(1, "second");
    pile.insert(2, "third");

    let ordered: Vec<_> = pile.iter().copied().collect();
    assert_eq!(ordered, vec!["first", "second", "third"]);
    assert_eq!(pile.list_ids(), &[3, 1, 2]);
}

#[test]
fn test_pile_reinsert_keeps_position() {
    let mut pile = Pile::new();
    pile.insert("a", 1);
    pile.insert("b", 2);

    let previous = pile.insert("a", 10);

    assert_eq!(previous, Some(1));
    assert_eq!(pile.len(), 2);
    assert_eq!(pile.iter().copied().collect::<Vec<_>>(), vec![10, 2]);
}

#[test]
fn test_pile_filter() {
    let mut pile = Pile::new();
    pile.insert(1, "apple".to_string());
    pile.insert(2, "banana".to_string());
    pile.insert(3, "apple pie".to_string());

    let apple_items = pile.filter(|item| item.contains("apple"));
    assert_eq!(apple_items.len(), 2);
    assert_eq!(apple_items[0], "apple");
    assert_eq!(apple_items[1], "apple pie");
}

#[test]
fn test_pile_remove() {
    let mut pile = Pile::new();
    pile.insert(1, "test".to_string());

    assert_eq!(pile.len(), 1);
    let removed = pile.remove(&1);
    assert_eq!(removed, Some("test".to_string()));
    assert!(pile.is_empty());
    assert!(pile.list_ids().is_empty());
    assert!(pile.remove(&1).is_none());
}

#[test]
fn test_pile_clear() {
    let mut pile = Pile::new();
    pile.insert(1, 'x');
    pile.insert(2, 'y');
    pile.clear();
    assert!(pile.is_empty());
    assert_eq!(pile.iter().count(), 0);
}

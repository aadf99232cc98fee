use super::progression::Progression;
use std::collections::HashMap;
use std::hash::Hash;

/// A container that provides both map-based access by id and ordered access
/// in insertion order.
#[derive(Debug, Clone)]
pub struct Pile<K, T> {
    // Map for direct id-based access
    items: HashMap<K, T>,
    // Ordered sequence of ids for maintaining order
    order: Progression<K>,
}

impl<K, T> Pile<K, T>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Progression::new(),
        }
    }

    /// Insert an item with a specific id. Re-inserting an existing id replaces
    /// the item in place and keeps its original position.
    pub fn insert(&mut self, id: K, item: T) -> Option<T> {
        let previous = self.items.insert(id.clone(), item);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Get an item by id
    pub fn get(&self, id: &K) -> Option<&T> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &K) -> Option<&mut T> {
        self.items.get_mut(id)
    }

    /// Iterate all items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Iterate items mutably, in no particular order
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.items.values_mut()
    }

    /// List all ids in insertion order
    pub fn list_ids(&self) -> &[K] {
        self.order.list()
    }

    /// Check if the pile contains an item with the given id
    pub fn contains(&self, id: &K) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove an item by id
    pub fn remove(&mut self, id: &K) -> Option<T> {
        let item = self.items.remove(id)?;
        self.order.remove(id);
        Some(item)
    }

    /// Clear all items
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
    }

    /// Items matching the predicate, in insertion order
    pub fn filter<F>(&self, predicate: F) -> Vec<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.iter().filter(|item| predicate(item)).collect()
    }
}

impl<K, T> Default for Pile<K, T>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

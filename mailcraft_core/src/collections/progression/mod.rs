use serde::{Deserialize, Serialize};

/// An ordered sequence of ids. Order is significant: it is the order in which
/// ids were pushed, and the order in which consumers walk them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progression<K> {
    steps: Vec<K>,
}

impl<K: PartialEq> Progression<K> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append an id at the end of the sequence
    pub fn push(&mut self, id: K) {
        self.steps.push(id);
    }

    pub fn list(&self) -> &[K] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.steps.contains(id)
    }

    /// Remove every occurrence of `id`, returning how many were dropped
    pub fn remove(&mut self, id: &K) -> usize {
        let before = self.steps.len();
        self.steps.retain(|step| step != id);
        before - self.steps.len()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

impl<K: PartialEq> Default for Progression<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq> FromIterator<K> for Progression<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a, K> IntoIterator for &'a Progression<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

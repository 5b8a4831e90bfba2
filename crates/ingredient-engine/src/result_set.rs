use crate::store::IngredientGraph;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Insertion-ordered set of vertex indices.
///
/// Iteration yields indices in the order they were first inserted; removal
/// keeps the relative order of the rest.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    order: Vec<usize>,
    members: HashSet<usize>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Insert `x` unless it is already present. Returns whether it was added.
    pub fn insert_if_absent(&mut self, x: usize) -> bool {
        if self.members.insert(x) {
            self.order.push(x);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, x: usize) -> bool {
        self.members.contains(&x)
    }

    /// Remove `x` if present. Returns whether anything was removed.
    pub fn remove_value(&mut self, x: usize) -> bool {
        if !self.members.remove(&x) {
            return false;
        }
        if let Some(pos) = self.order.iter().position(|&v| v == x) {
            self.order.remove(pos);
        }
        true
    }

    /// Remove every member of `other`.
    pub fn subtract(&mut self, other: &ResultSet) {
        for x in other.iter() {
            self.remove_value(x);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.order.clone()
    }

    /// Members as labels, in iteration order.
    pub fn labels<'g>(&self, graph: &'g IngredientGraph) -> Vec<&'g str> {
        self.iter().map(|i| graph.label_of(i)).collect()
    }

    /// Members as a plain set, for order-insensitive comparison.
    pub fn as_set(&self) -> &HashSet<usize> {
        &self.members
    }
}

impl PartialEq for ResultSet {
    /// Set equality; insertion order is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for ResultSet {}

impl FromIterator<usize> for ResultSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        for x in iter {
            set.insert_if_absent(x);
        }
        set
    }
}

impl Extend<usize> for ResultSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for x in iter {
            self.insert_if_absent(x);
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = usize;
    type IntoIter = std::vec::IntoIter<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.order.iter())
    }
}

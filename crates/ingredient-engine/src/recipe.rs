use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of ingredient slots in a recipe.
pub const RECIPE_SLOTS: usize = 10;

/// Fixed-capacity list of ingredient labels. An empty slot holds `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    slots: [String; RECIPE_SLOTS],
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill slots in order; remaining slots stay empty.
    pub fn from_labels<I, S>(labels: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.len() > RECIPE_SLOTS {
            return Err(GraphError::RecipeOverflow {
                given: labels.len(),
            });
        }
        let mut recipe = Self::new();
        for (slot, label) in labels.into_iter().enumerate() {
            recipe.slots[slot] = label;
        }
        Ok(recipe)
    }

    pub fn slots(&self) -> &[String; RECIPE_SLOTS] {
        &self.slots
    }

    /// Label in `slot`, `None` when the slot is unused or out of range.
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots
            .get(slot)
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    /// First occupied slot holding `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.occupied()
            .find(|&(_, held)| held == label)
            .map(|(slot, _)| slot)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    /// Occupied slots as `(slot, label)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, label)| !label.is_empty())
            .map(|(slot, label)| (slot, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn replace(&mut self, slot: usize, label: &str) -> String {
        std::mem::replace(&mut self.slots[slot], label.to_string())
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.occupied().map(|(_, label)| label).collect();
        write!(f, "{}", labels.join(", "))
    }
}

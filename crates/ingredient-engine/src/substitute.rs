//! Best-substitute search for a single recipe ingredient.
//!
//! A candidate's score is the total weight from every other recipe
//! ingredient to it, read from the recipe ingredient's row. The ingredient
//! being replaced contributes nothing and is never its own substitute.

use crate::error::GraphResult;
use crate::recipe::Recipe;
use crate::store::IngredientGraph;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub index: usize,
    pub score: f64,
}

/// What [`IngredientGraph::substitute`] did to the recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubstituteOutcome {
    Replaced {
        slot: usize,
        previous: String,
        replacement: String,
        score: f64,
    },
    /// No ingredient outside the recipe scored above zero.
    NoCandidate,
    /// The target is not in any occupied slot; the recipe is untouched.
    TargetNotInRecipe,
}

impl SubstituteOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

impl IngredientGraph {
    /// Highest-scoring ingredient to stand in for `target`, if any scores
    /// above zero. Ties go to the lowest index.
    pub fn best_substitute(&self, recipe: &Recipe, target: &str) -> GraphResult<Option<Candidate>> {
        let target = self.index_of(target)?;
        let members = recipe
            .occupied()
            .map(|(_, label)| self.index_of(label))
            .collect::<GraphResult<Vec<usize>>>()?;

        let mut in_recipe = vec![false; self.len()];
        for &m in &members {
            in_recipe[m] = true;
        }
        in_recipe[target] = true;

        let contributors: Vec<usize> = members.into_iter().filter(|&m| m != target).collect();

        let mut best: Option<Candidate> = None;
        let mut max = 0.0;
        for candidate in (0..self.len()).filter(|&c| !in_recipe[c]) {
            let score: f64 = contributors
                .iter()
                .map(|&m| self.weight(m, candidate))
                .sum();
            if score > max {
                max = score;
                best = Some(Candidate {
                    index: candidate,
                    score,
                });
            }
        }

        Ok(best)
    }

    /// Replace `target` in `recipe` with its best-scoring substitute.
    ///
    /// Every occupied slot and the target are resolved first; an unknown
    /// label fails before the recipe is touched. Only the first slot holding
    /// the target is rewritten.
    pub fn substitute(&self, recipe: &mut Recipe, target: &str) -> GraphResult<SubstituteOutcome> {
        let best = self.best_substitute(recipe, target)?;

        let Some(slot) = recipe.position(target) else {
            debug!(ingredient = target, "substitution target not in recipe");
            return Ok(SubstituteOutcome::TargetNotInRecipe);
        };

        let Some(candidate) = best else {
            debug!(ingredient = target, "no substitute scored above zero");
            return Ok(SubstituteOutcome::NoCandidate);
        };

        let replacement = self.label_of(candidate.index).to_string();
        let previous = recipe.replace(slot, &replacement);
        debug!(
            ingredient = target,
            replacement = %replacement,
            score = candidate.score,
            slot,
            "ingredient substituted"
        );

        Ok(SubstituteOutcome::Replaced {
            slot,
            previous,
            replacement,
            score: candidate.score,
        })
    }
}

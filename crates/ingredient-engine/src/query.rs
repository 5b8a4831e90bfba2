use crate::config::EngineConfig;
use crate::error::GraphResult;
use crate::recipe::Recipe;
use crate::store::IngredientGraph;
use crate::substitute::SubstituteOutcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single request against the graph.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Query {
    /// Every ingredient label, in index order.
    Labels,
    Neighbors {
        ingredient: String,
    },
    Bounded {
        ingredient: String,
        k: usize,
    },
    Restricted {
        ingredient: String,
        avoid: String,
        k_source: usize,
        k_avoid: usize,
    },
    Substitute {
        recipe: Vec<String>,
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Ingredients {
        ingredients: Vec<String>,
    },
    Substitution(SubstitutionReport),
}

/// The recipe after a substitution attempt, plus what happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstitutionReport {
    /// Occupied slots, in slot order.
    pub recipe: Vec<String>,
    #[serde(flatten)]
    pub outcome: SubstituteOutcome,
}

/// Shared read-only graph plus the settings queries run with.
#[derive(Clone)]
pub struct QueryEngine {
    graph: Arc<IngredientGraph>,
    config: Arc<EngineConfig>,
}

impl QueryEngine {
    pub fn new(graph: IngredientGraph, config: EngineConfig) -> Self {
        Self {
            graph: Arc::new(graph),
            config: Arc::new(config),
        }
    }

    pub fn graph(&self) -> &IngredientGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn execute(&self, query: Query) -> GraphResult<QueryResponse> {
        let graph: &IngredientGraph = &self.graph;
        let names = |set: crate::result_set::ResultSet| QueryResponse::Ingredients {
            ingredients: set.labels(graph).into_iter().map(String::from).collect(),
        };

        match query {
            Query::Labels => Ok(QueryResponse::Ingredients {
                ingredients: graph.labels().to_vec(),
            }),
            Query::Neighbors { ingredient } => graph.direct_neighbors(&ingredient).map(names),
            Query::Bounded { ingredient, k } => {
                let strategy = self.config.strategy_for(k.min(graph.len()));
                graph
                    .bounded_neighbors_with(&ingredient, k, 0, strategy)
                    .map(names)
            }
            Query::Restricted {
                ingredient,
                avoid,
                k_source,
                k_avoid,
            } => {
                let depth = k_source.max(k_avoid).min(graph.len());
                let strategy = self.config.strategy_for(depth);
                graph
                    .restricted_neighbors_with(&ingredient, &avoid, k_source, k_avoid, strategy)
                    .map(names)
            }
            Query::Substitute { recipe, target } => {
                let mut recipe = Recipe::from_labels(recipe)?;
                let outcome = graph.substitute(&mut recipe, &target)?;
                Ok(QueryResponse::Substitution(SubstitutionReport {
                    recipe: recipe.occupied().map(|(_, l)| l.to_string()).collect(),
                    outcome,
                }))
            }
        }
    }
}

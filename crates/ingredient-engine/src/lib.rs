//! Ingredient co-occurrence graph.
//!
//! Vertices are ingredients and a positive weight `w[i][j]` counts how often
//! `i` and `j` appeared together in a recipe. On top of that the crate
//! answers direct-neighbor, bounded-distance and restricted reachability
//! queries, and finds the best substitute for one ingredient of a recipe.

pub mod config;
pub mod error;
pub mod loader;
pub mod persistence;
pub mod query;
pub mod recipe;
pub mod result_set;
pub mod rpc_types;
pub mod stdio;
pub mod store;
pub mod substitute;
pub mod traversal;

pub use config::{EngineConfig, GraphSize, TraversalStrategy};
pub use error::{GraphError, GraphResult};
pub use query::{Query, QueryEngine, QueryResponse, SubstitutionReport};
pub use recipe::{Recipe, RECIPE_SLOTS};
pub use result_set::ResultSet;
pub use store::IngredientGraph;
pub use substitute::{Candidate, SubstituteOutcome};

//! Error types for graph construction, queries and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by every graph operation.
///
/// A failed query never touches the graph or any other result set, so every
/// variant is recoverable from the caller's point of view.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    /// A supplied ingredient label does not match any vertex.
    #[error("ingredient not found: {label:?}")]
    LabelNotFound { label: String },

    /// A bounded-neighbor query was asked for fewer than one hop.
    #[error("invalid distance {k}: at least one hop is required")]
    InvalidDistance { k: usize },

    /// The matrix is not N x N, or the label table does not have N entries.
    #[error("dimension mismatch: matrix is {rows}x{cols} but {labels} labels were given")]
    DimensionMismatch {
        rows: usize,
        cols: usize,
        labels: usize,
    },

    /// Empty, multi-line or duplicate label in the label table.
    #[error("invalid label at index {index}: {reason}")]
    InvalidLabel { index: usize, reason: String },

    /// Negative or non-finite edge weight.
    #[error("invalid weight {value} at ({row}, {col})")]
    InvalidWeight { row: usize, col: usize, value: f64 },

    /// More labels than a recipe has slots.
    #[error("recipe holds at most {max} ingredients, {given} were given", max = crate::recipe::RECIPE_SLOTS)]
    RecipeOverflow { given: usize },

    /// Reading the matrix or label files failed.
    #[error("failed to load {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// A configuration value that does not parse.
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub(crate) fn label_not_found(label: &str) -> Self {
        Self::LabelNotFound {
            label: label.to_string(),
        }
    }

    pub(crate) fn invalid_config(key: &str, value: &str) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

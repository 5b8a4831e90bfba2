use crate::error::{GraphError, GraphResult};
use crate::result_set::ResultSet;
use ndarray::Array2;
use std::collections::HashMap;
use tracing::{info, warn};

/// Dense weighted co-occurrence graph with string-labeled vertices.
///
/// `weight(i, j) > 0` is an edge from `i` to `j` whose value counts how often
/// the two ingredients appeared together. The matrix is read row-major and is
/// never assumed symmetric. Diagonal entries are ignored by every query.
#[derive(Debug, Clone)]
pub struct IngredientGraph {
    labels: Vec<String>,
    weights: Array2<f64>,
    // Label -> index, built once at construction.
    index: HashMap<String, usize>,
}

impl IngredientGraph {
    /// Build a graph from a label table and an N x N weight matrix.
    pub fn new(labels: Vec<String>, weights: Array2<f64>) -> GraphResult<Self> {
        let (rows, cols) = weights.dim();
        if rows != cols || rows != labels.len() {
            return Err(GraphError::DimensionMismatch {
                rows,
                cols,
                labels: labels.len(),
            });
        }

        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(GraphError::InvalidLabel {
                    index: i,
                    reason: "label is empty".to_string(),
                });
            }
            if label.contains(['\n', '\r']) {
                return Err(GraphError::InvalidLabel {
                    index: i,
                    reason: "label contains a line break".to_string(),
                });
            }
            if let Some(first) = index.insert(label.clone(), i) {
                return Err(GraphError::InvalidLabel {
                    index: i,
                    reason: format!("duplicate of index {}", first),
                });
            }
        }

        for ((row, col), &value) in weights.indexed_iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::InvalidWeight { row, col, value });
            }
        }

        let graph = Self {
            labels,
            weights,
            index,
        };

        let self_loops = (0..graph.len())
            .filter(|&i| graph.weights[[i, i]] != 0.0)
            .count();
        if self_loops > 0 {
            warn!(self_loops, "non-zero diagonal entries will be ignored");
        }
        info!(
            vertices = graph.len(),
            edges = graph.edge_count(),
            "ingredient graph ready"
        );

        Ok(graph)
    }

    /// Build a graph from nested rows.
    pub fn from_rows(labels: Vec<String>, rows: Vec<Vec<f64>>) -> GraphResult<Self> {
        let n = rows.len();
        let mut flat = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(GraphError::DimensionMismatch {
                    rows: n,
                    cols: row.len(),
                    labels: labels.len(),
                });
            }
            flat.extend(row);
        }
        let weights = Array2::from_shape_vec((n, n), flat).map_err(|_| {
            GraphError::DimensionMismatch {
                rows: n,
                cols: n,
                labels: labels.len(),
            }
        })?;
        Self::new(labels, weights)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Index of the vertex carrying `label`, exact match.
    pub fn index_of(&self, label: &str) -> GraphResult<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| GraphError::label_not_found(label))
    }

    /// Label of vertex `index`.
    ///
    /// # Panics
    /// If `index >= self.len()`.
    pub fn label_of(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Weight of the edge `from -> to`, read from `from`'s row.
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[[from, to]]
    }

    /// Whether `from -> to` is an edge. Self-loops never count.
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        from != to && self.weights[[from, to]] > 0.0
    }

    /// Out-neighbors of `from` in index order, self excluded.
    pub fn successors(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        self.weights
            .row(from)
            .into_iter()
            .enumerate()
            .filter(move |&(to, &w)| to != from && w > 0.0)
            .map(|(to, _)| to)
    }

    /// Number of off-diagonal positive entries.
    pub fn edge_count(&self) -> usize {
        self.weights
            .indexed_iter()
            .filter(|&((i, j), &w)| i != j && w > 0.0)
            .count()
    }

    pub fn is_symmetric(&self) -> bool {
        self.weights == self.weights.t()
    }

    /// Every ingredient directly related to `label`, in index order.
    pub fn direct_neighbors(&self, label: &str) -> GraphResult<ResultSet> {
        let position = self.index_of(label)?;
        Ok(self.successors(position).collect())
    }
}

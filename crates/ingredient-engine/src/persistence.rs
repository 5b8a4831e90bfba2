use crate::error::{GraphError, GraphResult};
use crate::store::IngredientGraph;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialized form of an ingredient graph: labels plus the row-major matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub labels: Vec<String>,
    pub n: usize,
    pub weights: Vec<f64>, // row-major, n * n
}

impl From<&IngredientGraph> for GraphSnapshot {
    fn from(graph: &IngredientGraph) -> Self {
        Self {
            labels: graph.labels().to_vec(),
            n: graph.len(),
            weights: graph.weights().iter().copied().collect(),
        }
    }
}

impl GraphSnapshot {
    pub fn save_to_file(&self, path: &Path) -> GraphResult<()> {
        let data = bincode::serialize(self).map_err(|e| GraphError::Snapshot(e.to_string()))?;
        fs::write(path, data)?;
        info!(path = %path.display(), vertices = self.n, "graph snapshot saved");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> GraphResult<Self> {
        let data = fs::read(path)?;
        let snapshot: GraphSnapshot =
            bincode::deserialize(&data).map_err(|e| GraphError::Snapshot(e.to_string()))?;
        info!(path = %path.display(), vertices = snapshot.n, "graph snapshot loaded");
        Ok(snapshot)
    }

    /// Rebuild the graph, re-running all construction checks.
    pub fn into_graph(self) -> GraphResult<IngredientGraph> {
        let weights = Array2::from_shape_vec((self.n, self.n), self.weights).map_err(|e| {
            GraphError::Snapshot(format!("weights do not form a {0}x{0} matrix: {1}", self.n, e))
        })?;
        IngredientGraph::new(self.labels, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::kitchen;

    #[test]
    fn snapshot_restores_queries() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("kitchen.bin");
        let graph = kitchen();

        GraphSnapshot::from(&graph).save_to_file(&path)?;
        let restored = GraphSnapshot::load_from_file(&path)?.into_graph()?;

        assert_eq!(restored.labels(), graph.labels());
        assert_eq!(
            restored.bounded_neighbors("rice", 2)?,
            graph.bounded_neighbors("rice", 2)?
        );
        Ok(())
    }

    #[test]
    fn truncated_weights_are_rejected() {
        let mut snapshot = GraphSnapshot::from(&kitchen());
        snapshot.weights.pop();
        assert!(matches!(snapshot.into_graph(), Err(GraphError::Snapshot(_))));
    }

    #[test]
    fn garbage_file_is_a_snapshot_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("junk.bin");
        fs::write(&path, [0xffu8; 3])?;
        assert!(matches!(
            GraphSnapshot::load_from_file(&path),
            Err(GraphError::Snapshot(_))
        ));
        Ok(())
    }
}

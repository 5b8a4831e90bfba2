//! Reads the adjacency matrix and ingredient names from disk.
//!
//! Matrices come either as a raw dump of `n * n` little-endian `f64` values
//! in row-major order (`.dat`) or as comma-separated rows (`.csv`). Names are
//! one per line.

use crate::config::EngineConfig;
use crate::error::{GraphError, GraphResult};
use crate::store::IngredientGraph;
use ndarray::Array2;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const F64_BYTES: usize = std::mem::size_of::<f64>();

/// Read an `n x n` matrix from a raw `f64` dump.
pub fn load_matrix_dat(path: &Path, n: usize) -> GraphResult<Array2<f64>> {
    let bytes = fs::read(path).map_err(|e| GraphError::load(path, e))?;
    let needed = n
        .checked_mul(n)
        .and_then(|cells| cells.checked_mul(F64_BYTES))
        .ok_or_else(|| GraphError::load(path, format!("a {}x{} matrix size overflows", n, n)))?;
    if bytes.len() < needed {
        return Err(GraphError::load(
            path,
            format!("expected {} bytes for a {}x{} matrix, found {}", needed, n, n, bytes.len()),
        ));
    }
    if bytes.len() > needed {
        warn!(path = %path.display(), extra = bytes.len() - needed, "ignoring trailing bytes");
    }

    let values: Vec<f64> = bytes[..needed]
        .chunks_exact(F64_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; F64_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    Array2::from_shape_vec((n, n), values).map_err(|e| GraphError::load(path, e))
}

/// Read a square matrix from comma-separated rows, one row per line.
pub fn load_matrix_csv(path: &Path) -> GraphResult<Array2<f64>> {
    let content = fs::read_to_string(path).map_err(|e| GraphError::load(path, e))?;
    parse_matrix_csv(&content).map_err(|reason| GraphError::load(path, reason))
}

fn parse_matrix_csv(content: &str) -> Result<Array2<f64>, String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        let row = record
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|e| format!("row {}: {:?}: {}", line, field, e))
            })
            .collect::<Result<Vec<f64>, String>>()?;
        rows.push(row);
    }

    let n = rows.len();
    if let Some((line, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(format!(
            "row {} has {} columns, expected {}",
            line,
            row.len(),
            n
        ));
    }

    Array2::from_shape_vec((n, n), rows.concat()).map_err(|e| e.to_string())
}

/// Read `n` ingredient names, stripping line terminators.
pub fn load_labels(path: &Path, n: usize) -> GraphResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| GraphError::load(path, e))?;
    let labels: Vec<String> = content
        .lines()
        .take(n)
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();

    if labels.len() < n {
        return Err(GraphError::load(
            path,
            format!("expected {} ingredient names, found {}", n, labels.len()),
        ));
    }
    for label in &labels {
        debug!(ingredient = %label, "loaded ingredient");
    }
    Ok(labels)
}

/// Load the graph the config points at.
pub fn load_graph(config: &EngineConfig) -> GraphResult<IngredientGraph> {
    let matrix_path = config.matrix_path();
    let labels_path = config.labels_path();

    let is_csv = matrix_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let weights = if is_csv {
        load_matrix_csv(&matrix_path)?
    } else {
        load_matrix_dat(&matrix_path, config.graph_size.vertices())?
    };
    let labels = load_labels(&labels_path, weights.nrows())?;

    let graph = IngredientGraph::new(labels, weights)?;
    if !graph.is_symmetric() {
        warn!(path = %matrix_path.display(), "adjacency matrix is not symmetric");
    }
    info!(
        matrix = %matrix_path.display(),
        labels = %labels_path.display(),
        vertices = graph.len(),
        "graph loaded"
    );
    Ok(graph)
}

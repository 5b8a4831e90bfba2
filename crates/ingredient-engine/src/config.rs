//! Engine configuration: data location, graph size and traversal strategy.
//!
//! Values come from defaults, then environment variables, then whatever the
//! binary's flags override.

use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_RECURSION_LIMIT: usize = 512;

/// How bounded-neighbor queries walk the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalStrategy {
    /// Recursive unless the effective depth exceeds the recursion limit.
    #[default]
    Auto,
    Recursive,
    #[serde(alias = "work-list", alias = "iterative")]
    WorkList,
}

impl TraversalStrategy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "recursive" | "dfs" => Some(Self::Recursive),
            "worklist" | "work-list" | "iterative" | "bfs" => Some(Self::WorkList),
            _ => None,
        }
    }

    /// Pick a concrete walk for a query whose effective depth is `depth`.
    ///
    /// `Auto` recurses up to `recursion_limit` and uses the work list above
    /// it. The other strategies are returned unchanged.
    pub fn resolve(self, depth: usize, recursion_limit: usize) -> Self {
        match self {
            Self::Auto if depth > recursion_limit => Self::WorkList,
            Self::Auto => Self::Recursive,
            other => other,
        }
    }
}

/// Which of the shipped data sets to read, or a custom vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphSize {
    Small,
    #[default]
    Full,
    Custom(usize),
}

impl GraphSize {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "small" => Some(Self::Small),
            "full" => Some(Self::Full),
            other => other.parse().ok().map(Self::from_vertices),
        }
    }

    pub fn from_vertices(n: usize) -> Self {
        match n {
            10 => Self::Small,
            400 => Self::Full,
            n => Self::Custom(n),
        }
    }

    pub fn vertices(&self) -> usize {
        match self {
            Self::Small => 10,
            Self::Full => 400,
            Self::Custom(n) => *n,
        }
    }

    fn suffix(&self) -> String {
        match self {
            Self::Small => "small".to_string(),
            Self::Full => "full".to_string(),
            Self::Custom(n) => n.to_string(),
        }
    }

    /// Default adjacency matrix file name for this size.
    pub fn matrix_file(&self) -> String {
        format!("AdjMat_{}.dat", self.suffix())
    }

    /// Default ingredient names file name for this size.
    pub fn labels_file(&self) -> String {
        format!("Ingredient_names_{}.txt", self.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub graph_size: GraphSize,
    /// Explicit matrix path; relative paths resolve against `data_dir`.
    pub matrix_path: Option<PathBuf>,
    /// Explicit labels path; relative paths resolve against `data_dir`.
    pub labels_path: Option<PathBuf>,
    pub traversal: TraversalStrategy,
    /// Depth above which `Auto` switches to the work-list walk.
    pub recursion_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            graph_size: GraphSize::default(),
            matrix_path: None,
            labels_path: None,
            traversal: TraversalStrategy::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `INGREDIENT_*` environment variables.
    ///
    /// A variable that is set but does not parse is an error.
    pub fn from_env() -> GraphResult<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("INGREDIENT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(size) = std::env::var("INGREDIENT_GRAPH_SIZE") {
            config.graph_size = GraphSize::parse(&size)
                .ok_or_else(|| GraphError::invalid_config("INGREDIENT_GRAPH_SIZE", &size))?;
        }
        if let Ok(strategy) = std::env::var("INGREDIENT_TRAVERSAL") {
            config.traversal = TraversalStrategy::parse(&strategy)
                .ok_or_else(|| GraphError::invalid_config("INGREDIENT_TRAVERSAL", &strategy))?;
        }
        if let Ok(limit) = std::env::var("INGREDIENT_RECURSION_LIMIT") {
            config.recursion_limit = limit
                .trim()
                .parse()
                .map_err(|_| GraphError::invalid_config("INGREDIENT_RECURSION_LIMIT", &limit))?;
        }

        Ok(config)
    }

    /// Read a JSON config file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::load(path, e))?;
        serde_json::from_str(&content).map_err(|e| GraphError::load(path, e))
    }

    pub fn matrix_path(&self) -> PathBuf {
        match &self.matrix_path {
            Some(p) => self.data_dir.join(p),
            None => self.data_dir.join(self.graph_size.matrix_file()),
        }
    }

    pub fn labels_path(&self) -> PathBuf {
        match &self.labels_path {
            Some(p) => self.data_dir.join(p),
            None => self.data_dir.join(self.graph_size.labels_file()),
        }
    }

    /// Resolve `Auto` for a query whose effective depth is `depth`.
    pub fn strategy_for(&self, depth: usize) -> TraversalStrategy {
        self.traversal.resolve(depth, self.recursion_limit)
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ingredient_engine::loader::load_graph;
use ingredient_engine::persistence::GraphSnapshot;
use ingredient_engine::stdio::run_stdio;
use ingredient_engine::{
    EngineConfig, GraphSize, IngredientGraph, Query, QueryEngine, QueryResponse,
    TraversalStrategy,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Query an ingredient co-occurrence graph.
#[derive(Parser, Debug)]
#[command(name = "ingraph", version)]
#[command(about = "Related ingredients, restricted neighborhoods and recipe substitutions")]
struct Cli {
    /// Directory holding the matrix and ingredient name files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Data set: small, full, or a vertex count.
    #[arg(long, global = true)]
    size: Option<String>,

    /// Adjacency matrix file (.dat raw f64 dump or .csv).
    #[arg(long, global = true)]
    matrix: Option<PathBuf>,

    /// Ingredient names file, one per line.
    #[arg(long, global = true)]
    labels: Option<PathBuf>,

    /// Load a bincode snapshot instead of the matrix/names pair.
    #[arg(long, global = true, conflicts_with_all = ["matrix", "labels"])]
    snapshot: Option<PathBuf>,

    /// JSON config file; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Traversal strategy: auto, recursive or worklist.
    #[arg(long, global = true)]
    traversal: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every ingredient.
    List,
    /// Ingredients that appear together with INGREDIENT.
    Neighbors { ingredient: String },
    /// Ingredients within K hops of INGREDIENT.
    Within {
        ingredient: String,
        #[arg(short, long, default_value_t = 1)]
        k: usize,
    },
    /// Ingredients near INGREDIENT but away from AVOID.
    Avoid {
        ingredient: String,
        avoid: String,
        #[arg(long, default_value_t = 1)]
        k_source: usize,
        #[arg(long, default_value_t = 1)]
        k_avoid: usize,
    },
    /// Replace TARGET in a recipe with its best substitute.
    Substitute {
        target: String,
        /// Comma-separated recipe, at most 10 ingredients.
        #[arg(long, value_delimiter = ',')]
        recipe: Vec<String>,
    },
    /// Save the loaded graph as a bincode snapshot.
    Snapshot { out: PathBuf },
    /// Serve JSON-RPC queries on stdin/stdout.
    Serve,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {:?}", path))?,
        None => EngineConfig::from_env().context("Invalid INGREDIENT_* environment")?,
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(size) = &cli.size {
        config.graph_size = GraphSize::parse(size)
            .with_context(|| format!("Unknown graph size: {}", size))?;
    }
    if let Some(matrix) = &cli.matrix {
        config.matrix_path = Some(matrix.clone());
    }
    if let Some(labels) = &cli.labels {
        config.labels_path = Some(labels.clone());
    }
    if let Some(strategy) = &cli.traversal {
        config.traversal = TraversalStrategy::parse(strategy)
            .with_context(|| format!("Unknown traversal strategy: {}", strategy))?;
    }
    Ok(config)
}

fn open_graph(cli: &Cli, config: &EngineConfig) -> Result<IngredientGraph> {
    match &cli.snapshot {
        Some(path) => GraphSnapshot::load_from_file(path)
            .and_then(GraphSnapshot::into_graph)
            .with_context(|| format!("Failed to load snapshot {:?}", path)),
        None => load_graph(config).context("Failed to load ingredient graph"),
    }
}

fn print_response(response: &QueryResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }
    match response {
        QueryResponse::Ingredients { ingredients } => {
            for ingredient in ingredients {
                println!("{}", ingredient);
            }
        }
        QueryResponse::Substitution(report) => {
            for ingredient in &report.recipe {
                println!("{}", ingredient);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    let graph = open_graph(&cli, &config)?;

    let query = match &cli.command {
        Command::List => Query::Labels,
        Command::Neighbors { ingredient } => Query::Neighbors {
            ingredient: ingredient.clone(),
        },
        Command::Within { ingredient, k } => Query::Bounded {
            ingredient: ingredient.clone(),
            k: *k,
        },
        Command::Avoid {
            ingredient,
            avoid,
            k_source,
            k_avoid,
        } => Query::Restricted {
            ingredient: ingredient.clone(),
            avoid: avoid.clone(),
            k_source: *k_source,
            k_avoid: *k_avoid,
        },
        Command::Substitute { target, recipe } => Query::Substitute {
            recipe: recipe.iter().map(|s| s.trim().to_string()).collect(),
            target: target.clone(),
        },
        Command::Snapshot { out } => {
            GraphSnapshot::from(&graph)
                .save_to_file(out)
                .with_context(|| format!("Failed to write snapshot {:?}", out))?;
            return Ok(());
        }
        Command::Serve => {
            run_stdio(QueryEngine::new(graph, config)).await?;
            return Ok(());
        }
    };

    let engine = QueryEngine::new(graph, config);
    let response = engine.execute(query)?;
    if let QueryResponse::Substitution(report) = &response {
        tracing::info!(outcome = ?report.outcome, "substitution finished");
    }
    print_response(&response, cli.json)
}

//! Lineage CLI - inspect table lineage CSVs as layered graphs
//!
//! Usage:
//!   lineage validate <file.csv>
//!   lineage graph <file.csv> [--filter column=value]... [--format text|json]
//!   lineage facets <file.csv> --column <name> [--filter column=value]...
//!   lineage hide|reveal <file.csv> <table>
//!   lineage move <file.csv> <table> <x> <y>
//!   lineage reset <file.csv>
//!
//! Examples:
//!   lineage graph lineage.csv --filter parentTableType=source
//!   lineage facets lineage.csv --column relationship
//!   lineage hide lineage.csv staging_orders

use clap::{Parser, Subcommand, ValueEnum};
use lineage::config::Settings;
use lineage::graph::LineageGraph;
use lineage::table::DatasetStatus;
use lineage::view_state::SqliteStore;
use lineage::{DisplayGraph, LineageError, LineageSession};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(about = "Lineage - render table lineage CSVs as layered graphs")]
#[command(version)]
struct Cli {
    /// Path to a lineage.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file has the required lineage columns
    Validate {
        /// Path to the lineage CSV
        file: PathBuf,
    },

    /// Print the displayed graph
    Graph {
        /// Path to the lineage CSV
        file: PathBuf,

        /// Keep only rows where column=value (repeatable)
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the values still selectable for a column
    Facets {
        /// Path to the lineage CSV
        file: PathBuf,

        /// Column to list values for
        #[arg(short, long)]
        column: String,

        /// Keep only rows where column=value (repeatable)
        #[arg(short, long, value_parser = parse_filter)]
        filter: Vec<(String, String)>,
    },

    /// Hide a table from the view
    Hide { file: PathBuf, table: String },

    /// Show a hidden table again
    Reveal { file: PathBuf, table: String },

    /// Pin a table at a position
    Move {
        file: PathBuf,
        table: String,
        x: f64,
        y: f64,
    },

    /// Forget hidden tables and pinned positions for a file
    Reset { file: PathBuf },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON document
    Json,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(column, value)| (column.trim().to_string(), value.to_string()))
        .filter(|(column, _)| !column.is_empty())
        .ok_or_else(|| format!("expected column=value, got '{}'", s))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Validate { file } => cmd_validate(&file, &settings),
        Commands::Graph {
            file,
            filter,
            format,
        } => cmd_graph(&file, &filter, format, &settings),
        Commands::Facets {
            file,
            column,
            filter,
        } => cmd_facets(&file, &column, &filter, &settings),
        Commands::Hide { file, table } => cmd_mutate(&file, &settings, |s| {
            s.hide(&table)?;
            Ok(format!("Hidden: {}", table))
        }),
        Commands::Reveal { file, table } => cmd_mutate(&file, &settings, |s| {
            s.reveal(&table)?;
            Ok(format!("Revealed: {}", table))
        }),
        Commands::Move { file, table, x, y } => cmd_mutate(&file, &settings, |s| {
            s.move_node(&table, lineage::graph::Position::new(x, y))?;
            Ok(format!("Pinned {} at ({}, {})", table, x, y))
        }),
        Commands::Reset { file } => cmd_mutate(&file, &settings, |s| {
            s.reset_view()?;
            Ok("View state cleared".to_string())
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, LineageError> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    Ok(settings)
}

/// Decode a CSV file into a grid of strings, header first.
fn read_grid(file: &Path) -> Result<Vec<Vec<String>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(file)
        .map_err(|e| format!("Error reading file '{}': {}", file.display(), e))?;

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| format!("Error decoding '{}': {}", file.display(), e))
        })
        .collect()
}

fn open_session(
    file: &Path,
    settings: &Settings,
) -> Result<LineageSession<SqliteStore>, Box<dyn std::error::Error>> {
    let grid = read_grid(file)?;
    let store_path = settings.store.resolved_path().map_err(LineageError::from)?;
    let store = SqliteStore::open(&store_path).map_err(LineageError::from)?;
    Ok(LineageSession::open(grid, store, settings)?)
}

fn apply_filters(session: &mut LineageSession<SqliteStore>, filters: &[(String, String)]) {
    for (column, value) in filters {
        if !session
            .filters()
            .selected(column)
            .is_some_and(|values| values.contains(value))
        {
            session.toggle_filter(column, value);
        }
    }
}

fn cmd_validate(file: &Path, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(file, settings)?;
    match session.status() {
        DatasetStatus::Empty => {
            println!("✓ Columns valid; no data rows (empty graph)");
        }
        DatasetStatus::Populated { rows } => {
            let graph: LineageGraph = session.graph()?;
            println!(
                "✓ {} rows, {} tables, {} edges",
                rows,
                graph.node_count(),
                graph.edge_count()
            );
            for cycle in graph.cycles() {
                println!("  ! cycle: {}", cycle.join(" → "));
            }
        }
    }
    Ok(())
}

fn cmd_graph(
    file: &Path,
    filters: &[(String, String)],
    format: OutputFormat,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(file, settings)?;
    apply_filters(&mut session, filters);
    let display = session.display()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&display)?),
        OutputFormat::Text => print!("{}", render_text(&display)),
    }
    Ok(())
}

fn render_text(display: &DisplayGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Rows: {} of {}\n",
        display.counts.filtered, display.counts.total
    ));

    out.push_str("Tables:\n");
    for node in &display.nodes {
        let pin = if node.pinned { " (pinned)" } else { "" };
        out.push_str(&format!(
            "  L{} ({}, {}) {} [{}]{}\n",
            node.level, node.position.x, node.position.y, node.id, node.table_type, pin
        ));
    }

    out.push_str("Edges:\n");
    for edge in &display.edges {
        out.push_str(&format!("  {}\n", edge));
    }

    if !display.hidden.is_empty() {
        out.push_str(&format!("Hidden: {}\n", display.hidden.join(", ")));
    }
    out
}

fn cmd_facets(
    file: &Path,
    column: &str,
    filters: &[(String, String)],
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(file, settings)?;
    apply_filters(&mut session, filters);

    let selected = session.filters().selected(column).cloned().unwrap_or_default();
    for value in session.available_values(column) {
        let mark = if selected.contains(&value) { "x" } else { " " };
        let shown = if value.is_empty() { "(blank)" } else { value.as_str() };
        println!("[{}] {}", mark, shown);
    }
    Ok(())
}

fn cmd_mutate(
    file: &Path,
    settings: &Settings,
    change: impl FnOnce(&mut LineageSession<SqliteStore>) -> Result<String, Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(file, settings)?;
    let message = change(&mut session)?;
    println!("{}", message);
    Ok(())
}

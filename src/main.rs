//! diskmap - directory size visualization with a recoverable trash.
//!
//! Usage:
//!   diskmap scan [PATH]        Build and print a size tree
//!   diskmap trash put <PATH>   Move a path into the app trash
//!   diskmap trash list         List trashed items (app + system)
//!   diskmap trash restore <ID> Restore an app-trashed item
//!   diskmap trash delete <ID>  Permanently delete a trashed item
//!   diskmap trash empty        Empty the trash
//!   diskmap --help             Show help

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};

use diskmap_core::DiskNode;
use diskmap_scan::{ScanConfigBuilder, scan};
use diskmap_trash::{TrashSource, TrashStore};

#[derive(Parser)]
#[command(
    name = "diskmap",
    version,
    about = "Directory size visualization with a recoverable trash workflow",
    long_about = "diskmap builds a bounded size tree of a directory, folding small \
                  files and folders into summary buckets, and manages a journaled \
                  trash that can restore what it deletes."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a size tree and print it
    Scan {
        /// Path to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Maximum recursion depth before folding into buckets
        #[arg(short, long, default_value = "4")]
        depth: u32,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file for JSON (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Trash operations
    Trash {
        #[command(subcommand)]
        action: TrashAction,
    },
}

#[derive(Subcommand)]
enum TrashAction {
    /// Move a path into the app trash
    Put {
        /// Path to trash
        path: PathBuf,
    },

    /// List trashed items, newest first
    List,

    /// Restore an item to its original path
    Restore {
        /// Item id from `trash list`
        id: String,
    },

    /// Permanently delete a trashed item
    Delete {
        /// Item id from `trash list`
        id: String,
    },

    /// Remove everything from the trash
    Empty,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            path,
            depth,
            format,
            output,
        } => run_scan(&path, depth, format, output).await,
        Command::Trash { action } => run_trash(action),
    }
}

/// Build the size tree and render it.
async fn run_scan(
    path: &PathBuf,
    depth: u32,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let path = path.canonicalize().context("Invalid path")?;

    eprintln!("Scanning {}...", path.display());

    let config = ScanConfigBuilder::default()
        .root(&path)
        .max_depth(depth)
        .build()
        .context("Invalid scan configuration")?;
    let tree = scan(config).await.context("Scan failed")?;

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(" {} - {}", path.display(), format_size(tree.value));
            println!("{}", "─".repeat(60));
            println!();
            print_node(&tree, 0, tree.value);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tree)?;
            match output {
                Some(output_path) => {
                    std::fs::write(&output_path, json)
                        .with_context(|| format!("Failed to write {}", output_path.display()))?;
                    eprintln!("Exported to {}", output_path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

/// Dispatch a trash subcommand against the default store.
fn run_trash(action: TrashAction) -> Result<()> {
    let store = TrashStore::open(TrashStore::default_root()).context("Failed to open trash")?;

    match action {
        TrashAction::Put { path } => {
            let path = path.canonicalize().context("Invalid path")?;
            let entry = store.move_to_trash(&path)?;
            println!("Trashed {} (id {})", entry.name, entry.id);
        }
        TrashAction::List => {
            let items = store.list_items();
            if items.is_empty() {
                println!("Trash is empty.");
                return Ok(());
            }
            for item in items {
                let when = DateTime::<Utc>::from_timestamp_millis(item.trashed_at)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let origin = match item.source {
                    TrashSource::App => "app",
                    TrashSource::System => "sys",
                };
                println!(
                    " {:>10}  {}  [{}]  {}",
                    format_size(item.size),
                    when,
                    origin,
                    item.name
                );
                println!("             id: {}", item.id);
            }
        }
        TrashAction::Restore { id } => {
            let destination = store.restore(&id)?;
            println!("Restored to {}", destination.display());
        }
        TrashAction::Delete { id } => {
            store.permanently_delete(&id)?;
            println!("Deleted {id}");
        }
        TrashAction::Empty => {
            store.empty_trash()?;
            println!("Trash emptied.");
        }
    }

    Ok(())
}

/// Print a node and its children, largest share first at each level.
fn print_node(node: &DiskNode, depth: u32, root_size: u64) {
    let indent = "  ".repeat(depth as usize);
    let ratio = if root_size > 0 {
        node.value as f64 / root_size as f64 * 100.0
    } else {
        0.0
    };

    let marker = if node.is_dir() { "▼ " } else { "  " };
    let bar = make_bar(ratio / 100.0, 10);

    println!(
        "{}{}{:<40} {:>10} {:>5.1}% {}",
        indent,
        marker,
        truncate(node.id.as_str(), 40),
        format_size(node.value),
        ratio,
        bar
    );

    if let Some(children) = &node.children {
        for child in children {
            print_node(child, depth + 1, root_size);
        }
    }
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 1).collect();
        format!("{cut}…")
    }
}

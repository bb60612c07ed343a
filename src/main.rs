// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use portfolio_store::logging::{init_logging, parse_rotation, LogConfig, LOG_FILENAME};
use portfolio_store::utils::{default_data_dir, default_portfolio_home, get_config_path};
use portfolio_store::{load_config, CollectionKind, Portfolio, PortfolioError};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// Portfolio Store - collections of images with persisted display orders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding collections, meta lists and the order document
    #[arg(long, env = "PORTFOLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (default: <data-dir>/portfolio.toml)
    #[arg(long, env = "PORTFOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Enable JSON log format (for production/log aggregation)
    #[arg(long, env = "PORTFOLIO_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "PORTFOLIO_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.portfolio/logs)
    #[arg(long, env = "PORTFOLIO_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty collection
    Create {
        id: String,
        /// section, exhibit, or other
        #[arg(long, default_value = "exhibit")]
        kind: CollectionKind,
    },
    /// Delete a collection and everything ordered in it
    DeleteCollection { id: String },
    /// List collection IDs of one kind
    List {
        #[arg(default_value = "exhibit")]
        kind: CollectionKind,
    },
    /// Prepend an item (JSON) to a collection
    Upload {
        id: String,
        item: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete the item at a storage position
    Delete { id: String, position: usize },
    /// Move the item at one display index to another
    Move { id: String, from: usize, to: usize },
    /// Move an item to the front of another collection
    Transfer {
        source: String,
        position: usize,
        target: String,
    },
    /// Replace the display order (comma-separated storage positions)
    Reorder {
        id: String,
        #[arg(value_delimiter = ',')]
        order: Vec<usize>,
    },
    /// Set or clear a tag on a storage position
    Tag {
        id: String,
        position: usize,
        tag: String,
        #[arg(long)]
        clear: bool,
    },
    /// Print the items of a collection in display order
    Show { id: String },
    /// Drop invalid and repeated positions from a stored order
    Repair { id: String },
}

fn report_warnings(warnings: &[PortfolioError]) {
    for warning in warnings {
        warn!("{warning}");
    }
}

async fn run(portfolio: &Portfolio, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Create { id, kind } => {
            let result = portfolio.create_collection(&id, kind).await?;
            report_warnings(&result.order_warnings);
            writeln!(out, "created {} ({})", result.created.id, result.created.kind)?;
            if let Some(source) = result.copied_from {
                writeln!(out, "copied items and order from {source}")?;
            }
        }
        Command::DeleteCollection { id } => {
            let result = portfolio.delete_collection(&id).await?;
            report_warnings(&result.order_warnings);
            writeln!(out, "deleted {} ({})", result.deleted.id, result.deleted.kind)?;
        }
        Command::List { kind } => {
            for id in portfolio.records().list_ids(kind).await? {
                writeln!(out, "{id}")?;
            }
        }
        Command::Upload { id, item, tags } => {
            let item: Value = serde_json::from_str(&item).wrap_err("item must be valid JSON")?;
            let result = portfolio.upload_item(&id, item, &tags).await?;
            report_warnings(&result.order_warnings);
            writeln!(out, "{id}: {} items", result.length)?;
        }
        Command::Delete { id, position } => {
            let result = portfolio.delete_item(&id, position).await?;
            report_warnings(&result.order_warnings);
            writeln!(out, "{}", serde_json::to_string(&result.item)?)?;
        }
        Command::Move { id, from, to } => {
            let order = portfolio.move_item_to_index(&id, from, to).await?;
            writeln!(out, "{}", serde_json::to_string(&order)?)?;
        }
        Command::Transfer {
            source,
            position,
            target,
        } => {
            let result = portfolio.transfer_item(&source, position, &target).await?;
            report_warnings(&result.order_warnings);
            writeln!(out, "{}", serde_json::to_string(&result.item)?)?;
        }
        Command::Reorder { id, order } => {
            let aliases = portfolio.reorder(&id, &order).await?;
            writeln!(out, "reordered {}", aliases.join(", "))?;
        }
        Command::Tag {
            id,
            position,
            tag,
            clear,
        } => portfolio.set_tag(&id, position, &tag, !clear).await?,
        Command::Show { id } => {
            for displayed in portfolio.display_items(&id).await? {
                writeln!(out, "{}", serde_json::to_string(&displayed)?)?;
            }
        }
        Command::Repair { id } => match portfolio.repair_order(&id).await? {
            Some(order) => writeln!(out, "{}", serde_json::to_string(&order)?)?,
            None => writeln!(out, "{id} has no stored order")?,
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    // Parse CLI arguments first (before logging, so we can use log config)
    let args = Args::parse();

    let log_dir = args
        .log_dir
        .unwrap_or_else(|| default_portfolio_home().join("logs"));
    let log_file = log_dir.join(LOG_FILENAME);
    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(log_config) {
        eprintln!();
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_file.display());
        eprintln!();
        return Err(e);
    }

    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let config_path = args
        .config
        .unwrap_or_else(|| get_config_path(&data_dir));
    let config = load_config(&config_path)
        .wrap_err_with(|| format!("Failed to load {}", config_path.display()))?;

    info!("Opening portfolio at {}", data_dir.display());
    let portfolio = Portfolio::open(&data_dir, config)?;

    let mut out = std::io::stdout().lock();
    run(&portfolio, args.command, &mut out).await
}

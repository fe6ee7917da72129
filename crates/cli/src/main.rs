//! Replenish CLI - Refresh the replenishment workbook from Shopify.
//!
//! # Usage
//!
//! ```bash
//! # Fill OnHand..LastSync for the SKUs in InventoryLive
//! replenish inventory
//!
//! # Rewrite ProductsExport from the catalog
//! replenish export
//!
//! # List the store's location names
//! replenish locations
//!
//! # Use another workbook directory
//! replenish --workbook ./sheets inventory
//! ```
//!
//! # Environment Variables
//!
//! See `replenish_sync::config` for the Shopify and workbook settings. In
//! addition:
//!
//! - `RUST_LOG` - Log filter (default: `replenish_sync=info,replenish_cli=info`)
//! - `REPLENISH_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Report warnings and errors to Sentry when set
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "replenish")]
#[command(author, version, about = "Replenishment workbook jobs for Shopify")]
struct Cli {
    /// Directory holding the workbook sheets (overrides `REPLENISH_WORKBOOK_DIR`)
    #[arg(long, global = true, value_name = "DIR")]
    workbook: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh quantities in the InventoryLive sheet
    Inventory,
    /// Rewrite the ProductsExport sheet from the catalog
    Export,
    /// List the store's location names
    Locations,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "replenish_sync=info,replenish_cli=info".into());

    let json = std::env::var("REPLENISH_LOG_JSON").is_ok();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let mut config = replenish_sync::SyncConfig::from_env()?;
    if let Some(dir) = cli.workbook {
        config.workbook_dir = dir;
    }

    match cli.command {
        Commands::Inventory => commands::inventory::run(&config).await?,
        Commands::Export => commands::export::run(&config).await?,
        Commands::Locations => commands::locations::run(&config).await?,
    }
    Ok(())
}

//! featherlay - resource chicken laying add-on
//!
//! Headless host that runs the add-on against an in-memory world.

mod config;
mod drop_tables;
mod headless;

use anyhow::Result;
use clap::Parser;
use config::{AddonConfig, DEFAULT_CONFIG_PATH};
use featherlay_world::DropTables;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless resource chicken session", long_about = None)]
struct Args {
    /// Add-on config (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Drop-table pack (JSON) applied over the built-in tables
    #[arg(long)]
    drop_tables: Option<PathBuf>,
    /// Number of chickens to spawn
    #[arg(long, default_value_t = 12)]
    chickens: usize,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 24_000)]
    ticks: u64,
    /// Override the session seed from the config
    #[arg(long)]
    seed: Option<u64>,
    /// Write lay/feed events to this JSONL file
    #[arg(long)]
    record: Option<PathBuf>,
    /// Query the world for chickens each pass instead of using the registry
    #[arg(long)]
    live_query: bool,
}

fn main() -> Result<()> {
    // WARN by default (overridable via RUST_LOG). Reloadable so the config's
    // debug flag can raise it once the config is read.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let has_env_filter = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("warn")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut addon = AddonConfig::load_from_path(&args.config);
    if let Some(seed) = args.seed {
        addon.seed = seed;
    }
    if addon.debug_logging && !has_env_filter {
        filter_handle.modify(|filter| *filter = EnvFilter::new("debug"))?;
    }

    info!("Starting featherlay v{}", env!("CARGO_PKG_VERSION"));

    let tables = match &args.drop_tables {
        Some(path) => drop_tables::load_drop_tables_lenient(path),
        None => DropTables::builtin(),
    };

    let summary = headless::run(HeadlessConfig {
        addon,
        tables,
        chickens: args.chickens,
        ticks: args.ticks,
        live_query: args.live_query,
        record: args.record,
    })?;

    println!(
        "Simulated {} ticks with {} chickens: {} passes, {} drops, {} failed attempts, {} fed",
        summary.ticks, summary.chickens, summary.passes, summary.produced, summary.failed, summary.fed
    );
    for (item, count) in &summary.items {
        println!("  {item:<32} {count}");
    }
    Ok(())
}

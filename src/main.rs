mod config;
mod dispenser;
mod inventory;
mod status;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::MachineConfig;
use crate::dispenser::Dispenser;
use crate::inventory::InventoryStore;
use crate::status::StdoutSink;

#[derive(Debug, Clone, Parser)]
#[command(about = "Prepares every configured beverage against a shared ingredient stock")]
struct Args {
    /// Machine config: outlets, ingredient stock and recipes (.json, .yml or .yaml).
    pub config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dispenser=info".parse()?))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = MachineConfig::load(&args.config)?;

    let inventory = InventoryStore::new(config.inventory);
    let dispenser = Dispenser::new(Arc::new(inventory), config.outlets);

    let report = dispenser.prepare_all(&config.recipes).await?;
    report.emit_to(&mut StdoutSink);

    info!(remaining = ?dispenser.inventory().snapshot(), "inventory after run");

    Ok(())
}

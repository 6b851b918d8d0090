mod cli;
mod demo;

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;

use stockroom_core::{Clock, SystemClock};
use stockroom_infra::{AppConfig, InMemoryStore, JsonFileStore, LedgerStore, SeedFile, SharedLedger};
use stockroom_inventory::MovementRequest;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let command = Cli::parse().into_command();

    let config = AppConfig::from_env().context("invalid configuration")?;
    stockroom_observability::init(config.log_format);

    tracing::info!(
        recent_limit = config.recent_limit,
        persistent = config.store_path.is_some(),
        "stockroom console starting"
    );

    let store: Arc<dyn LedgerStore> = match &config.store_path {
        Some(path) => Arc::new(
            JsonFileStore::open(path).with_context(|| format!("opening store {}", path.display()))?,
        ),
        None => Arc::new(InMemoryStore::new()),
    };

    let seed = match &config.seed_path {
        Some(path) => SeedFile::from_path(path)
            .with_context(|| format!("loading seed {}", path.display()))?,
        None => demo::catalog(),
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ledger = SharedLedger::bootstrap(store, clock, |clock| seed.into_ledger(clock))?;

    if let Command::Record(movement) = command {
        let Some(actor) = demo::find_user(&movement.username) else {
            bail!("unknown user '{}'", movement.username);
        };
        let mut request =
            MovementRequest::new(movement.product_id, movement.kind.into(), movement.quantity, actor);
        request.reason = movement.reason();

        let recorded = ledger.apply_movement(request)?;
        println!("{}", serde_json::to_string_pretty(&recorded)?);
    }

    let dashboard = ledger.dashboard(config.recent_limit, &Local)?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);
    Ok(())
}

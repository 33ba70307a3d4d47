//! # Production Economy Demo
//!
//! Starts an economy (the built-in chain, or the JSON file named by
//! `PRODUCTION_CONFIG`), speeds up its first System and slows down its last one
//! halfway through, then shuts down and prints the report as JSON.

use production_economy::lifecycle::{setup_tracing, ProductionConfig, ProductionSystem};
use tracing::{info, Instrument};

fn load_config() -> Result<ProductionConfig, String> {
    match std::env::var("PRODUCTION_CONFIG") {
        Ok(path) => {
            info!(%path, "Loading config");
            ProductionConfig::from_path(&path).map_err(|e| e.to_string())
        }
        Err(_) => Ok(ProductionConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = load_config()?;
    info!(run_ms = config.run_ms, "Starting production economy");

    let economy = ProductionSystem::new(&config).map_err(|e| e.to_string())?;
    let half = config.run_for() / 2;

    let span = tracing::info_span!("first_half");
    async { tokio::time::sleep(half).await }.instrument(span).await;

    if let Some(first) = economy.systems().next() {
        first.speed_up();
        info!(system = first.name(), "Sped up");
    }
    if let Some(last) = economy.systems().last() {
        last.slow_down();
        info!(system = last.name(), "Slowed down");
    }

    let span = tracing::info_span!("second_half");
    async { tokio::time::sleep(config.run_for() - half).await }
        .instrument(span)
        .await;

    let report = economy.shutdown().await.map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{json}");

    info!("Application completed successfully");
    Ok(())
}


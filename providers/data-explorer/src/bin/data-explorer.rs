//! Data Explorer binary entry point
//!
//! Runs the harmonization and catalog pipelines side by side, then prints a
//! JSON summary of both runs to stdout.

use anyhow::{Context, Result};
use tracing::info;

use data_explorer::{run_catalog_cleaning, run_harmonization, summarize, Explorer, ExplorerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("data_explorer=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("═══════════════════════════════════════════════════════════════");
    info!("  Data Explorer - Starting");
    info!("═══════════════════════════════════════════════════════════════");

    let config = ExplorerConfig::from_env();
    config.validate()?;

    info!("Data dir: {}", config.data_dir.display());
    info!("Output dir: {}", config.output_dir.display());
    info!(
        "Plan: {}",
        config
            .plan_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in 2015-2019".to_string())
    );
    info!("Top N: {}", config.top_n);
    info!("Export: {}", config.export);

    let happiness_config = config.clone();
    let catalog_config = config.clone();
    let (happiness, catalog) = tokio::join!(
        tokio::task::spawn_blocking(move || run_harmonization(&happiness_config)),
        tokio::task::spawn_blocking(move || run_catalog_cleaning(&catalog_config)),
    );
    let happiness = happiness.context("Harmonization task panicked")??;
    let catalog = catalog.context("Catalog task panicked")??;

    let explorer = Explorer::new()
        .with_happiness(happiness.table.clone())
        .with_catalog(catalog.table.clone());
    let summary = summarize(&explorer, &happiness, &catalog, config.top_n)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("Data Explorer finished");
    Ok(())
}

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{CatalogSource, HttpCatalogSource, MissingCatalogSource};
use tokio::io::BufReader;
use tracing::{info, warn};

mod app;
mod commands;
mod config;
mod render;

use app::Storefront;
use config::{load_settings, Overrides, Settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Browse a product catalog and manage a shopping cart")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    catalog_url: Option<String>,
    #[arg(long)]
    log_filter: Option<String>,
}

fn catalog_source(settings: &Settings) -> Result<Arc<dyn CatalogSource>> {
    let catalog_url = settings.catalog_url.trim();
    if catalog_url.is_empty() {
        warn!("no catalog url configured; the catalog will fail to load");
        return Ok(Arc::new(MissingCatalogSource));
    }

    let source = match settings.request_timeout() {
        Some(timeout) => HttpCatalogSource::with_timeout(catalog_url, timeout)?,
        None => HttpCatalogSource::new(catalog_url),
    };
    Ok(Arc::new(source))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(
        &args.config,
        &Overrides {
            catalog_url: args.catalog_url,
            log_filter: args.log_filter,
        },
    )?;

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();
    info!(catalog_url = %settings.catalog_url, "starting storefront");

    let storefront = Storefront::mount(catalog_source(&settings)?);
    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout().lock();
    storefront.run(input, &mut out).await
}

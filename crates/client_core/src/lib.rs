use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::domain::Product;
use tracing::debug;
use url::Url;

pub mod cart;
pub mod catalog;
pub mod view;

pub use cart::{CartAction, CartState, CartStore};
pub use catalog::{CatalogLoader, CatalogState};
pub use view::{CartRowView, CartSummaryView, CatalogView, ProductCardView};

pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Where the product catalog comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>>;
}

/// Stand-in used when no catalog endpoint is available; every fetch fails.
pub struct MissingCatalogSource;

#[async_trait]
impl CatalogSource for MissingCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        Err(anyhow!("catalog source is unavailable"))
    }
}

/// Fetches the catalog with a single GET against a fixed endpoint.
pub struct HttpCatalogSource {
    http: Client,
    catalog_url: String,
}

impl HttpCatalogSource {
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), catalog_url)
    }

    /// Builds a source whose requests give up after `timeout`.
    pub fn with_timeout(catalog_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build catalog http client")?;
        Ok(Self::with_client(http, catalog_url))
    }

    pub fn with_client(http: Client, catalog_url: impl Into<String>) -> Self {
        Self {
            http,
            catalog_url: catalog_url.into(),
        }
    }

    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let url = Url::parse(&self.catalog_url)
            .with_context(|| format!("invalid catalog url '{}'", self.catalog_url))?;
        debug!(%url, "requesting product catalog");

        let products: Vec<Product> = self
            .http
            .get(url)
            .send()
            .await
            .context("catalog request failed")?
            .error_for_status()?
            .json()
            .await
            .context("catalog response is not a product list")?;

        Ok(products)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

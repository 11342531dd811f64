use std::{collections::HashSet, sync::Arc};

use shared::{
    domain::{Product, ProductId},
    error::CatalogLoadFailure,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::CatalogSource;

/// Outcome of the one catalog fetch. `Success` and `Error` are terminal.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogState {
    #[default]
    Loading,
    Success(Vec<Product>),
    Error(String),
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn products(&self) -> &[Product] {
        match self {
            Self::Success(products) => products.as_slice(),
            Self::Loading | Self::Error(_) => &[],
        }
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products().iter().find(|product| product.id == id)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message.as_str()),
            Self::Loading | Self::Success(_) => None,
        }
    }

    /// Moves out of `Loading`. Returns `false`, leaving the state untouched,
    /// once a terminal state has been reached.
    pub fn resolve(&mut self, result: Result<Vec<Product>, CatalogLoadFailure>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = match result {
            Ok(products) => Self::Success(products),
            Err(err) => Self::Error(err.user_message().to_string()),
        };
        true
    }
}

/// Fetches and validates the whole catalog; any failure rejects all of it.
pub async fn load(source: &dyn CatalogSource) -> Result<Vec<Product>, CatalogLoadFailure> {
    let products = source
        .fetch_products()
        .await
        .map_err(|err| CatalogLoadFailure::new(format!("{err:#}")))?;
    validate_catalog(&products)?;
    Ok(products)
}

pub fn validate_catalog(products: &[Product]) -> Result<(), CatalogLoadFailure> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(CatalogLoadFailure::new(format!(
                "product {} has invalid price {}",
                product.id, product.price
            )));
        }
        if !seen.insert(product.id) {
            return Err(CatalogLoadFailure::new(format!(
                "product id {} appears more than once",
                product.id
            )));
        }
    }
    Ok(())
}

/// Fetch-on-mount catalog loader. The fetch runs as a spawned task; dropping
/// the loader aborts it so a late response never lands anywhere.
pub struct CatalogLoader {
    state: watch::Receiver<CatalogState>,
    task: JoinHandle<()>,
}

impl CatalogLoader {
    /// Starts the single fetch. Must be called from within a tokio runtime.
    pub fn mount(source: Arc<dyn CatalogSource>) -> Self {
        let (state_tx, state) = watch::channel(CatalogState::Loading);
        let task = tokio::spawn(async move {
            let result = load(source.as_ref()).await;
            match &result {
                Ok(products) => info!(count = products.len(), "catalog loaded"),
                Err(err) => warn!(error = %err, "catalog load failed"),
            }
            state_tx.send_if_modified(|state| state.resolve(result));
        });

        Self { state, task }
    }

    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        !self.state.borrow().is_loading()
    }

    /// Waits for the fetch to settle. If the fetch task is gone without
    /// resolving (it panicked), the current state is returned as is.
    pub async fn settled(&mut self) -> CatalogState {
        if let Ok(state) = self.state.wait_for(|state| !state.is_loading()).await {
            return state.clone();
        }
        self.state.borrow().clone()
    }

    /// Tears the loader down, discarding any in-flight fetch.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for CatalogLoader {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            self.task.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;

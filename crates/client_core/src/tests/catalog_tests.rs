use std::time::Duration;

use super::*;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::error::CATALOG_LOAD_FAILURE_MESSAGE;
use tokio::sync::{oneshot, Mutex};

fn product(id: i64, price: f64) -> Product {
    Product {
        id: ProductId(id),
        title: format!("product {id}"),
        price,
        image: format!("https://img.example/{id}.jpg"),
    }
}

struct StaticCatalogSource {
    result: std::result::Result<Vec<Product>, String>,
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.result.clone().map_err(|err| anyhow!(err))
    }
}

/// Never answers until released; reports when its fetch future is dropped.
struct HangingCatalogSource {
    release: Mutex<Option<oneshot::Receiver<()>>>,
    dropped: Mutex<Option<oneshot::Sender<()>>>,
}

struct DropSignal(Option<oneshot::Sender<()>>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

#[async_trait]
impl CatalogSource for HangingCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let _signal = DropSignal(self.dropped.lock().await.take());
        let release = self.release.lock().await.take();
        if let Some(release) = release {
            let _ = release.await;
        }
        Ok(vec![product(1, 1.0)])
    }
}

fn mount_static(result: std::result::Result<Vec<Product>, String>) -> CatalogLoader {
    CatalogLoader::mount(Arc::new(StaticCatalogSource { result }))
}

#[test]
fn resolve_only_leaves_loading_once() {
    let mut state = CatalogState::default();
    assert!(state.is_loading());

    assert!(state.resolve(Ok(vec![product(1, 2.0)])));
    assert_eq!(state.products().len(), 1);

    assert!(!state.resolve(Err(CatalogLoadFailure::new("late failure"))));
    assert_eq!(state, CatalogState::Success(vec![product(1, 2.0)]));
}

#[test]
fn resolve_failure_uses_generic_message() {
    let mut state = CatalogState::Loading;
    assert!(state.resolve(Err(CatalogLoadFailure::new("dns error: no such host"))));
    assert_eq!(state.error_message(), Some(CATALOG_LOAD_FAILURE_MESSAGE));
    assert!(state.products().is_empty());
}

#[test]
fn validation_rejects_negative_price() {
    let err = validate_catalog(&[product(1, 3.0), product(2, -0.5)]).expect_err("must fail");
    assert!(err.reason.contains("invalid price"));
}

#[test]
fn validation_rejects_non_finite_price() {
    assert!(validate_catalog(&[product(1, f64::NAN)]).is_err());
}

#[test]
fn validation_rejects_duplicate_ids() {
    let err = validate_catalog(&[product(1, 3.0), product(1, 4.0)]).expect_err("must fail");
    assert!(err.reason.contains("more than once"));
}

#[test]
fn validation_accepts_free_products() {
    assert!(validate_catalog(&[product(1, 0.0)]).is_ok());
}

#[tokio::test]
async fn mounted_loader_reaches_success_in_order() {
    let mut loader = mount_static(Ok(vec![product(1, 1.0), product(2, 2.0), product(3, 3.0)]));

    let state = loader.settled().await;
    let ids: Vec<i64> = state.products().iter().map(|product| product.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(loader.is_settled());
    assert_eq!(loader.state(), state);
}

#[tokio::test]
async fn mounted_loader_reports_fetch_failure() {
    let mut loader = mount_static(Err("HTTP status server error (500)".into()));

    let state = loader.settled().await;
    assert_eq!(state.error_message(), Some(CATALOG_LOAD_FAILURE_MESSAGE));
    assert!(state.products().is_empty());
}

#[tokio::test]
async fn invalid_catalog_fails_as_a_whole() {
    let mut loader = mount_static(Ok(vec![product(1, 1.0), product(2, -1.0)]));
    let state = loader.settled().await;
    assert!(state.error_message().is_some());
    assert!(state.products().is_empty());
}

#[tokio::test]
async fn loader_stays_loading_while_fetch_is_pending() {
    let (release_tx, release_rx) = oneshot::channel();
    let (dropped_tx, _dropped_rx) = oneshot::channel();
    let mut loader = CatalogLoader::mount(Arc::new(HangingCatalogSource {
        release: Mutex::new(Some(release_rx)),
        dropped: Mutex::new(Some(dropped_tx)),
    }));

    tokio::task::yield_now().await;
    assert_eq!(loader.state(), CatalogState::Loading);

    release_tx.send(()).expect("release");
    let state = loader.settled().await;
    assert_eq!(state.products().len(), 1);
}

#[tokio::test]
async fn unmount_cancels_in_flight_fetch() {
    let (_release_tx, release_rx) = oneshot::channel();
    let (dropped_tx, dropped_rx) = oneshot::channel();
    let loader = CatalogLoader::mount(Arc::new(HangingCatalogSource {
        release: Mutex::new(Some(release_rx)),
        dropped: Mutex::new(Some(dropped_tx)),
    }));

    tokio::task::yield_now().await;
    loader.unmount();

    // Resolves either from the drop signal or from the source itself being
    // dropped with the aborted task.
    let _ = tokio::time::timeout(Duration::from_secs(5), dropped_rx)
        .await
        .expect("fetch was not cancelled");
}

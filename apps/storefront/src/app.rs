//! Application root: owns the cart and the catalog loader, routes commands to
//! them and renders the results.

use std::{io::Write, sync::Arc};

use anyhow::{Context, Result};
use client_core::{
    CartState, CartStore, CartSummaryView, CatalogLoader, CatalogSource, CatalogState,
    CatalogView,
};
use shared::protocol::StorefrontIntent;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::broadcast::{self, error::TryRecvError},
};
use tracing::{debug, info};

use crate::{
    commands::{self, Command, HELP},
    render,
};

pub struct Storefront {
    catalog: CatalogLoader,
    catalog_shown: bool,
    cart: CartStore,
    cart_events: broadcast::Receiver<CartState>,
}

impl Storefront {
    pub fn mount(source: Arc<dyn CatalogSource>) -> Self {
        let cart = CartStore::new();
        let cart_events = cart.subscribe();
        Self {
            catalog: CatalogLoader::mount(source),
            catalog_shown: false,
            cart,
            cart_events,
        }
    }

    #[cfg(test)]
    pub async fn wait_for_catalog(&mut self) -> CatalogState {
        self.catalog.settled().await
    }

    pub fn cart(&self) -> &CartState {
        self.cart.state()
    }

    pub fn handle(&mut self, command: Command) -> String {
        match command {
            Command::ListProducts => {
                render::catalog(&CatalogView::build(&self.catalog.state(), self.cart.state()))
            }
            Command::ShowCart => render::cart(&CartSummaryView::from(self.cart.state())),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
            Command::Intent(intent) => self.apply_intent(intent),
        }
    }

    fn apply_intent(&mut self, intent: StorefrontIntent) -> String {
        debug!(intent = intent.name(), "handling storefront intent");
        match intent {
            StorefrontIntent::Add { product_id } => {
                let catalog = self.catalog.state();
                if let Some(message) = catalog.error_message() {
                    return message.to_string();
                }
                if catalog.is_loading() {
                    return "Catalog is still loading".to_string();
                }
                let Some(product) = catalog.product(product_id) else {
                    return format!("No product with id {product_id}");
                };
                self.cart.add_to_cart(product);
            }
            StorefrontIntent::Remove { line_id } => {
                self.cart.remove_from_cart(line_id);
            }
            StorefrontIntent::IncrementQuantity { line_id } => {
                self.cart.increment_quantity(line_id);
            }
            StorefrontIntent::DecrementQuantity { line_id } => {
                self.cart.decrement_quantity(line_id);
            }
        }
        self.render_cart_change()
    }

    fn render_cart_change(&mut self) -> String {
        let mut latest = None;
        loop {
            match self.cart_events.try_recv() {
                Ok(state) => latest = Some(state),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        match latest {
            Some(state) => format!(
                "{}\n{}",
                render::cart(&CartSummaryView::from(&state)),
                render::badge(state.item_count())
            ),
            None => "Cart unchanged".to_string(),
        }
    }

    /// Runs the input loop until `quit` or end of input. The catalog keeps
    /// loading in the background while commands are handled.
    pub async fn run<R, W>(mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        writeln!(out, "{}", self.handle(Command::ListProducts))?;
        self.catalog_shown = self.catalog.is_settled();
        out.flush()?;

        loop {
            tokio::select! {
                _ = self.catalog.settled(), if !self.catalog_shown => {
                    self.catalog_shown = true;
                    writeln!(out, "{}", self.handle(Command::ListProducts))?;
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read input")? else {
                        break;
                    };
                    match commands::parse(&line) {
                        Ok(None) => {}
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => writeln!(out, "{}", self.handle(command))?,
                        Err(err) => writeln!(out, "{err}")?,
                    }
                }
            }
            out.flush()?;
        }

        info!(item_count = self.cart().item_count(), "storefront closed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;

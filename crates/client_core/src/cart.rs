//! Cart state container: a pure reducer over [`CartState`] snapshots and a
//! [`CartStore`] that owns the current snapshot and publishes every change.
//!
//! Re-adding a product that already has a line merges into that line; the cart
//! never holds two lines for the same product id.

use shared::domain::{CartLine, Product, ProductId};
use tokio::sync::broadcast;
use tracing::debug;

use crate::view::format_total;

const CART_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add { product: Product, quantity: u32 },
    Remove { id: ProductId },
    UpdateQuantity { id: ProductId, quantity: u32 },
    Increment { id: ProductId },
    Decrement { id: ProductId },
}

impl CartAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::Increment { .. } => "increment",
            Self::Decrement { .. } => "decrement",
        }
    }
}

/// Immutable view of the cart. Lines keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Unrounded sum of price times quantity.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn formatted_total(&self) -> String {
        format_total(self.total())
    }

    /// Applies `action`, returning the next snapshot or `None` when the action
    /// is rejected or changes nothing.
    pub fn reduce(&self, action: &CartAction) -> Option<Self> {
        let mut next = self.clone();
        let changed = match action {
            CartAction::Add { product, quantity } => next.apply_add(product, *quantity),
            CartAction::Remove { id } => next.apply_remove(*id),
            CartAction::UpdateQuantity { id, quantity } => next.apply_quantity(*id, *quantity),
            CartAction::Increment { id } => match self.line(*id) {
                Some(line) => line
                    .quantity
                    .checked_add(1)
                    .is_some_and(|quantity| next.apply_quantity(*id, quantity)),
                None => false,
            },
            CartAction::Decrement { id } => match self.line(*id) {
                Some(line) => line
                    .quantity
                    .checked_sub(1)
                    .is_some_and(|quantity| next.apply_quantity(*id, quantity)),
                None => false,
            },
        };
        changed.then_some(next)
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    fn apply_add(&mut self, product: &Product, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.position(product.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                let merged = line.quantity.saturating_add(quantity);
                if merged == line.quantity {
                    return false;
                }
                line.quantity = merged;
            }
            None => self.lines.push(CartLine::from_product(product, quantity)),
        }
        true
    }

    fn apply_remove(&mut self, id: ProductId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.lines.remove(index);
        true
    }

    // Zero would break the "every line has at least one unit" rule, so it is
    // rejected rather than treated as a removal.
    fn apply_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        let Some(index) = self.position(id) else {
            return false;
        };
        let line = &mut self.lines[index];
        if line.quantity == quantity {
            return false;
        }
        line.quantity = quantity;
        true
    }
}

/// Owns the session's cart. Mutations are serialized through `&mut self`;
/// subscribers get a snapshot after every effective change.
pub struct CartStore {
    state: CartState,
    events: broadcast::Sender<CartState>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    pub fn new() -> Self {
        Self::with_state(CartState::default())
    }

    pub fn with_state(state: CartState) -> Self {
        let (events, _) = broadcast::channel(CART_EVENT_CAPACITY);
        Self { state, events }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartState> {
        self.events.subscribe()
    }

    pub fn dispatch(&mut self, action: CartAction) -> CartState {
        let action_name = action.name();
        match self.state.reduce(&action) {
            Some(next) => {
                self.state = next;
                debug!(
                    action = action_name,
                    lines = self.state.lines().len(),
                    item_count = self.state.item_count(),
                    "cart updated"
                );
                // No receivers is fine: nobody is rendering the cart yet.
                let _ = self.events.send(self.state.clone());
            }
            None => debug!(action = action_name, "cart action ignored"),
        }
        self.state.clone()
    }

    pub fn add_to_cart(&mut self, product: &Product) -> CartState {
        self.add_to_cart_with_quantity(product, 1)
    }

    pub fn add_to_cart_with_quantity(&mut self, product: &Product, quantity: u32) -> CartState {
        self.dispatch(CartAction::Add {
            product: product.clone(),
            quantity,
        })
    }

    pub fn remove_from_cart(&mut self, id: ProductId) -> CartState {
        self.dispatch(CartAction::Remove { id })
    }

    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> CartState {
        self.dispatch(CartAction::UpdateQuantity { id, quantity })
    }

    pub fn increment_quantity(&mut self, id: ProductId) -> CartState {
        self.dispatch(CartAction::Increment { id })
    }

    pub fn decrement_quantity(&mut self, id: ProductId) -> CartState {
        self.dispatch(CartAction::Decrement { id })
    }

    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    pub fn total(&self) -> f64 {
        self.state.total()
    }
}

#[cfg(test)]
#[path = "tests/cart_tests.rs"]
mod tests;

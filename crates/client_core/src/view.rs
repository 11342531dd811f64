//! Typed view models handed to whatever renders the storefront.

use shared::domain::{CartLine, Product, ProductId};

use crate::{cart::CartState, catalog::CatalogState};

/// Unit prices are shown as the API sent them, without padding decimals.
pub fn price_label(price: f64) -> String {
    format!("${price}")
}

/// Totals are always shown with two decimals.
pub fn format_total(total: f64) -> String {
    format!("${total:.2}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub price_label: String,
    pub image: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price_label: price_label(product.price),
            image: product.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    Failed(String),
    Ready {
        products: Vec<ProductCardView>,
        cart_badge: u64,
    },
}

impl CatalogView {
    pub fn build(catalog: &CatalogState, cart: &CartState) -> Self {
        match catalog {
            CatalogState::Loading => Self::Loading,
            CatalogState::Error(message) => Self::Failed(message.clone()),
            CatalogState::Success(products) => Self::Ready {
                products: products.iter().map(ProductCardView::from).collect(),
                cart_badge: cart.item_count(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartRowView {
    pub id: ProductId,
    pub image: String,
    pub title: String,
    pub unit_price_label: String,
    pub quantity: u32,
    /// False at quantity one: the stepper must not offer a decrement.
    pub can_decrement: bool,
}

impl From<&CartLine> for CartRowView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            image: line.image.clone(),
            title: line.title.clone(),
            unit_price_label: price_label(line.price),
            quantity: line.quantity,
            can_decrement: line.quantity > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartSummaryView {
    pub rows: Vec<CartRowView>,
    pub item_count: u64,
    pub total_label: String,
}

impl From<&CartState> for CartSummaryView {
    fn from(cart: &CartState) -> Self {
        Self {
            rows: cart.lines().iter().map(CartRowView::from).collect(),
            item_count: cart.item_count(),
            total_label: cart.formatted_total(),
        }
    }
}

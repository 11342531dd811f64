//! Plain-text rendering of the view models.

use std::fmt::Write as _;

use client_core::{CartSummaryView, CatalogView};

pub fn catalog(view: &CatalogView) -> String {
    match view {
        CatalogView::Loading => "Loading...".to_string(),
        CatalogView::Failed(message) => message.clone(),
        CatalogView::Ready {
            products,
            cart_badge,
        } => {
            let mut out = String::from("Product List\n");
            for product in products {
                let _ = writeln!(
                    out,
                    "  [{:>3}] {} - {}",
                    product.id, product.title, product.price_label
                );
            }
            let _ = write!(out, "{}", badge(*cart_badge));
            out
        }
    }
}

pub fn cart(view: &CartSummaryView) -> String {
    let mut out = String::from("Shopping Cart\n");
    if view.rows.is_empty() {
        out.push_str("  (empty)\n");
    }
    for row in &view.rows {
        let stepper = if row.can_decrement { "-" } else { " " };
        let _ = writeln!(
            out,
            "  [{:>3}] {} | {} | {} {} + | remove",
            row.id, row.title, row.unit_price_label, stepper, row.quantity
        );
    }
    let _ = write!(out, "Total: {}", view.total_label);
    out
}

pub fn badge(item_count: u64) -> String {
    format!("Cart: {item_count}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{CartRowView, ProductCardView};
    use shared::domain::ProductId;

    #[test]
    fn renders_catalog_states() {
        assert_eq!(catalog(&CatalogView::Loading), "Loading...");
        assert_eq!(
            catalog(&CatalogView::Failed("Failed to load products".into())),
            "Failed to load products"
        );

        let text = catalog(&CatalogView::Ready {
            products: vec![ProductCardView {
                id: ProductId(1),
                title: "Backpack".into(),
                price_label: "$109.95".into(),
                image: "bag.jpg".into(),
            }],
            cart_badge: 3,
        });
        assert!(text.contains("Backpack - $109.95"));
        assert!(text.ends_with("Cart: 3"));
    }

    #[test]
    fn renders_cart_total_and_stepper() {
        let text = cart(&CartSummaryView {
            rows: vec![CartRowView {
                id: ProductId(2),
                image: "shirt.jpg".into(),
                title: "Shirt".into(),
                unit_price_label: "$22.3".into(),
                quantity: 1,
                can_decrement: false,
            }],
            item_count: 1,
            total_label: "$22.30".into(),
        });
        assert!(text.contains("Shirt | $22.3 |   1 +"));
        assert!(text.ends_with("Total: $22.30"));
    }

    #[test]
    fn renders_empty_cart() {
        let text = cart(&CartSummaryView {
            rows: Vec::new(),
            item_count: 0,
            total_label: "$0.00".into(),
        });
        assert!(text.contains("(empty)"));
    }
}

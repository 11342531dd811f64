use serde::{Deserialize, Serialize};

use crate::domain::ProductId;

/// User intents forwarded from the presentation layer into the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StorefrontIntent {
    Add { product_id: ProductId },
    Remove { line_id: ProductId },
    IncrementQuantity { line_id: ProductId },
    DecrementQuantity { line_id: ProductId },
}

impl StorefrontIntent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::IncrementQuantity { .. } => "increment_quantity",
            Self::DecrementQuantity { .. } => "decrement_quantity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_use_tagged_snake_case_encoding() {
        let intent = StorefrontIntent::DecrementQuantity {
            line_id: ProductId(4),
        };
        let value = serde_json::to_value(intent).expect("encode");
        assert_eq!(value["type"], "decrement_quantity");
        assert_eq!(value["payload"]["line_id"], 4);
    }
}

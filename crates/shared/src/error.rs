use thiserror::Error;

/// Message shown to the user whenever the catalog cannot be loaded.
pub const CATALOG_LOAD_FAILURE_MESSAGE: &str = "Failed to load products";

/// The only failure the storefront surfaces: the catalog could not be fetched,
/// decoded or validated. `reason` is kept for logs, never for display.
#[derive(Debug, Clone, Error)]
#[error("catalog load failed: {reason}")]
pub struct CatalogLoadFailure {
    pub reason: String,
}

impl CatalogLoadFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        CATALOG_LOAD_FAILURE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_hides_reason() {
        let err = CatalogLoadFailure::new("error decoding response body: expected value at line 1");
        assert_eq!(err.user_message(), "Failed to load products");
        assert!(err.to_string().contains("expected value"));
    }
}

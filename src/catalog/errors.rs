//! Catalog-specific error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog API error (HTTP {status})")]
    Status { status: u16 },

    #[error("Failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_names_the_status() {
        let message = CatalogError::Status { status: 500 }.to_string();
        assert!(message.contains("500"));
    }
}

//! Open-data catalog access: HTTP client, response types, record
//! formatting.

pub mod client;
pub mod errors;
pub mod format;
pub mod types;

pub use client::CatalogClient;
pub use errors::CatalogError;
pub use format::{PhotoSection, TreeCard};
pub use types::{SearchResponse, TreeRecord};

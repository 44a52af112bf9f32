//! Rotating-index ingestion of RNA performance metrics.
//!
//! A pull allocates the next index number, fetches the upstream payload and
//! replaces every stored row for that index number in a single transaction.
//! Exports read the newest rows for one device and render CSV.

pub mod error;
pub mod export_service;
pub mod index_service;
pub mod ingest_service;
pub mod payload;
pub mod pull_service;
pub mod rna_client;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::MetricsError;

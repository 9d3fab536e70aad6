//! Linkdrop metadata tracking
//!
//! Upload records and download audit events live in an external record store
//! behind the [`MetadataTracker`] trait. Three implementations are provided:
//! DynamoDB (the default deployment target), PostgreSQL and an in-process map
//! used by tests and single-node demos.

pub mod factory;
pub mod tracker;

pub use factory::create_metadata_tracker;
#[cfg(feature = "metadata-dynamodb")]
pub use tracker::DynamoMetadataTracker;
#[cfg(feature = "metadata-postgres")]
pub use tracker::PgMetadataTracker;
pub use tracker::{InMemoryMetadataTracker, MetadataTracker};

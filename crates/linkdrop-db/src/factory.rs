use std::sync::Arc;

use linkdrop_core::{Config, MetadataBackend};

use crate::tracker::{InMemoryMetadataTracker, MetadataTracker};

/// Create the metadata tracker selected by `METADATA_BACKEND`.
pub async fn create_metadata_tracker(config: &Config) -> anyhow::Result<Arc<dyn MetadataTracker>> {
    match config.metadata_backend() {
        #[cfg(feature = "metadata-dynamodb")]
        MetadataBackend::DynamoDb => {
            let region = config
                .aws_region()
                .or_else(|| config.s3_region())
                .map(String::from);
            let tracker = crate::tracker::DynamoMetadataTracker::connect(
                region,
                config.dynamodb_endpoint().map(String::from),
                config.dynamodb_uploads_table().to_string(),
                config.dynamodb_downloads_table().to_string(),
            )
            .await;
            Ok(Arc::new(tracker))
        }

        #[cfg(not(feature = "metadata-dynamodb"))]
        MetadataBackend::DynamoDb => Err(anyhow::anyhow!(
            "DynamoDB metadata backend not available (metadata-dynamodb feature not enabled)"
        )),

        #[cfg(feature = "metadata-postgres")]
        MetadataBackend::Postgres => {
            let database_url = config
                .database_url()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not configured"))?;
            let tracker = crate::tracker::PgMetadataTracker::connect(
                database_url,
                config.db_max_connections(),
                config.db_timeout_seconds(),
            )
            .await?;
            Ok(Arc::new(tracker))
        }

        #[cfg(not(feature = "metadata-postgres"))]
        MetadataBackend::Postgres => Err(anyhow::anyhow!(
            "PostgreSQL metadata backend not available (metadata-postgres feature not enabled)"
        )),

        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory metadata tracker; records are lost on restart");
            Ok(Arc::new(InMemoryMetadataTracker::new()))
        }
    }
}

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use linkdrop_core::{AppError, DownloadEvent, MetadataBackend, UploadRecord};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::MetadataTracker;

#[derive(Debug, sqlx::FromRow)]
struct UploadRow {
    key: String,
    original_name: String,
    size_bytes: i64,
    content_type: String,
    uploaded_at: DateTime<Utc>,
    uploaded_by: String,
}

impl From<UploadRow> for UploadRecord {
    fn from(row: UploadRow) -> Self {
        UploadRecord {
            key: row.key,
            original_name: row.original_name,
            size_bytes: row.size_bytes.max(0) as u64,
            content_type: row.content_type,
            uploaded_at: row.uploaded_at,
            uploaded_by: row.uploaded_by,
        }
    }
}

/// PostgreSQL tracker over the `uploads` and `download_events` tables.
#[derive(Clone)]
pub struct PgMetadataTracker {
    pool: PgPool,
}

impl PgMetadataTracker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and apply pending migrations from the workspace `migrations/` directory.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        timeout_seconds: u64,
    ) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(timeout_seconds))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        tracing::info!(max_connections, "Database connected successfully");

        let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
        let migrator = sqlx::migrate::Migrator::new(migrations_dir)
            .await
            .context("Failed to load migrations")?;
        migrator
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl MetadataTracker for PgMetadataTracker {
    #[tracing::instrument(skip(self, record), fields(
        db.system = "postgresql",
        db.table = "uploads",
        db.operation = "upsert",
        key = %record.key
    ))]
    async fn track_upload(&self, record: &UploadRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO uploads (key, original_name, size_bytes, content_type, uploaded_at, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (key) DO UPDATE SET
                original_name = EXCLUDED.original_name,
                size_bytes = EXCLUDED.size_bytes,
                content_type = EXCLUDED.content_type,
                uploaded_at = EXCLUDED.uploaded_at,
                uploaded_by = EXCLUDED.uploaded_by
            "#,
        )
        .bind(&record.key)
        .bind(&record.original_name)
        .bind(record.size_bytes as i64)
        .bind(&record.content_type)
        .bind(record.uploaded_at)
        .bind(&record.uploaded_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, event), fields(
        db.system = "postgresql",
        db.table = "download_events",
        db.operation = "insert",
        key = %event.key
    ))]
    async fn track_download(&self, event: &DownloadEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO download_events (key, downloaded_at, downloaded_by)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&event.key)
        .bind(event.downloaded_at)
        .bind(&event.downloaded_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql", db.table = "uploads", db.operation = "select"))]
    async fn get_metadata(&self, key: &str) -> Result<Option<UploadRecord>, AppError> {
        let row = sqlx::query_as::<_, UploadRow>(
            r#"
            SELECT key, original_name, size_bytes, content_type, uploaded_at, uploaded_by
            FROM uploads
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UploadRecord::from))
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql", db.table = "uploads", db.operation = "delete"))]
    async fn remove_metadata(&self, key: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM uploads WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.system = "postgresql", db.table = "uploads", db.operation = "select"))]
    async fn recent_uploads(&self, limit: usize) -> Result<Vec<UploadRecord>, AppError> {
        let rows = sqlx::query_as::<_, UploadRow>(
            r#"
            SELECT key, original_name, size_bytes, content_type, uploaded_at, uploaded_by
            FROM uploads
            ORDER BY uploaded_at DESC, key ASC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UploadRecord::from).collect())
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Postgres
    }
}

//! Configuration module
//!
//! Configuration is read once from the environment (a `.env` file is loaded
//! first when present), validated, and then handed to setup by value.

use std::env;
use std::str::FromStr;

use chrono::Duration;

use crate::backend_types::{MetadataBackend, StorageBackend};
use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_RECENT_UPLOADS_LIMIT, DEFAULT_SHARE_LINK_TTL_SECS,
};
use crate::share_link::ShareLinkPolicy;
use crate::validation::FileValidator;

const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: u64 = 10;
const MAX_SHARE_LINK_TTL_SECS: i64 = 365 * 24 * 60 * 60;
const DYNAMODB_UPLOADS_TABLE: &str = "Uploads";
const DYNAMODB_DOWNLOADS_TABLE: &str = "Downloads";

/// Settings shared by every deployment regardless of backends.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
}

/// Full Linkdrop configuration.
#[derive(Clone, Debug)]
pub struct LinkdropConfig {
    pub base: BaseConfig,
    // Content store
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, LocalStack, ...)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    // Metadata tracker
    pub metadata_backend: MetadataBackend,
    pub dynamodb_uploads_table: String,
    pub dynamodb_downloads_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Upload policy
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub share_link_ttl_secs: i64,
    pub recent_uploads_limit: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<LinkdropConfig>);

impl Config {
    fn inner(&self) -> &LinkdropConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = LinkdropConfig::from_lookup(lookup)?;
        config.validate()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().base.environment)
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.inner().metadata_backend
    }

    pub fn dynamodb_uploads_table(&self) -> &str {
        &self.inner().dynamodb_uploads_table
    }

    pub fn dynamodb_downloads_table(&self) -> &str {
        &self.inner().dynamodb_downloads_table
    }

    pub fn dynamodb_endpoint(&self) -> Option<&str> {
        self.inner().dynamodb_endpoint.as_deref()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }

    pub fn share_link_ttl(&self) -> Duration {
        Duration::seconds(self.inner().share_link_ttl_secs)
    }

    pub fn recent_uploads_limit(&self) -> usize {
        self.inner().recent_uploads_limit
    }

    pub fn file_validator(&self) -> FileValidator {
        FileValidator::new(self.max_file_size_bytes(), self.allowed_extensions().to_vec())
    }

    pub fn share_link_policy(&self) -> ShareLinkPolicy {
        ShareLinkPolicy::new(self.share_link_ttl())
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a numeric variable, falling back to `default` only when it is unset.
fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

impl LinkdropConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = non_empty(&lookup, "ENVIRONMENT")
            .or_else(|| non_empty(&lookup, "APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = parsed(&lookup, "PORT", SERVER_PORT)?;

        let storage_backend = match non_empty(&lookup, "STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::S3,
        };

        let metadata_backend = match non_empty(&lookup, "METADATA_BACKEND") {
            Some(s) => s.parse()?,
            None => MetadataBackend::DynamoDb,
        };

        let max_file_size_mb: u64 = parsed(&lookup, "MAX_FILE_SIZE_MB", MAX_FILE_SIZE_MB)?;
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        let allowed_extensions = non_empty(&lookup, "ALLOWED_EXTENSIONS")
            .map(|s| {
                s.split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_EXTENSIONS
                    .iter()
                    .map(|e| e.to_string())
                    .collect()
            });

        Ok(LinkdropConfig {
            base: BaseConfig {
                server_port,
                environment,
            },
            storage_backend,
            s3_bucket: non_empty(&lookup, "S3_BUCKET"),
            s3_region: non_empty(&lookup, "S3_REGION"),
            s3_endpoint: non_empty(&lookup, "S3_ENDPOINT"),
            aws_region: non_empty(&lookup, "AWS_REGION"),
            local_storage_path: non_empty(&lookup, "LOCAL_STORAGE_PATH"),
            metadata_backend,
            dynamodb_uploads_table: non_empty(&lookup, "DYNAMODB_UPLOADS_TABLE")
                .unwrap_or_else(|| DYNAMODB_UPLOADS_TABLE.to_string()),
            dynamodb_downloads_table: non_empty(&lookup, "DYNAMODB_DOWNLOADS_TABLE")
                .unwrap_or_else(|| DYNAMODB_DOWNLOADS_TABLE.to_string()),
            dynamodb_endpoint: non_empty(&lookup, "DYNAMODB_ENDPOINT"),
            database_url: non_empty(&lookup, "DATABASE_URL"),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: parsed(&lookup, "DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            max_file_size_bytes,
            allowed_extensions,
            share_link_ttl_secs: parsed(
                &lookup,
                "SHARE_LINK_TTL_SECS",
                DEFAULT_SHARE_LINK_TTL_SECS,
            )?,
            recent_uploads_limit: parsed(
                &lookup,
                "RECENT_UPLOADS_LIMIT",
                DEFAULT_RECENT_UPLOADS_LIMIT,
            )?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB cannot be 0"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        if self.share_link_ttl_secs <= 0 {
            return Err(anyhow::anyhow!("SHARE_LINK_TTL_SECS must be positive"));
        }

        if self.share_link_ttl_secs > MAX_SHARE_LINK_TTL_SECS {
            return Err(anyhow::anyhow!(
                "SHARE_LINK_TTL_SECS cannot exceed {} (one year)",
                MAX_SHARE_LINK_TTL_SECS
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        match self.metadata_backend {
            MetadataBackend::Postgres => match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when using postgres metadata backend"
                    ));
                }
                Some(url) if !url.starts_with("postgres://") && !url.starts_with("postgresql://") => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
                Some(_) => {
                    if self.db_max_connections == 0 {
                        return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS cannot be 0"));
                    }
                }
            },
            MetadataBackend::DynamoDb => {
                if self.aws_region.is_none() && self.s3_region.is_none() {
                    tracing::warn!(
                        "AWS_REGION not set; DynamoDB client will fall back to the default provider chain"
                    );
                }
            }
            MetadataBackend::Memory => {
                if is_production_name(&self.base.environment) {
                    tracing::warn!(
                        "In-memory metadata backend in production: records are lost on restart"
                    );
                }
            }
        }

        Ok(())
    }
}

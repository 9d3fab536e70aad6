use std::collections::HashMap;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use linkdrop_core::{AppError, DownloadEvent, MetadataBackend, UploadRecord};
use uuid::Uuid;

use super::{newest_first, MetadataTracker};

const ATTR_KEY: &str = "Key";
const ATTR_ORIGINAL_NAME: &str = "OriginalName";
const ATTR_SIZE_BYTES: &str = "SizeBytes";
const ATTR_CONTENT_TYPE: &str = "ContentType";
const ATTR_UPLOADED_AT: &str = "UploadedAt";
const ATTR_UPLOADED_BY: &str = "UploadedBy";
const ATTR_EVENT_ID: &str = "Id";
const ATTR_DOWNLOADED_AT: &str = "DownloadedAt";
const ATTR_DOWNLOADED_BY: &str = "DownloadedBy";

type Item = HashMap<String, AttributeValue>;

/// DynamoDB tracker.
///
/// Uploads table: partition key `Key` (S). Downloads table: partition key
/// `Id` (S, a fresh UUID per event) so every download appends a new item.
/// Timestamps are stored as RFC 3339 strings.
#[derive(Clone)]
pub struct DynamoMetadataTracker {
    client: Client,
    uploads_table: String,
    downloads_table: String,
}

impl DynamoMetadataTracker {
    pub fn new(client: Client, uploads_table: String, downloads_table: String) -> Self {
        Self {
            client,
            uploads_table,
            downloads_table,
        }
    }

    /// Build a client from the standard AWS environment.
    ///
    /// `region` falls back to the provider chain when `None`. `endpoint_url`
    /// targets DynamoDB Local or LocalStack.
    pub async fn connect(
        region: Option<String>,
        endpoint_url: Option<String>,
        uploads_table: String,
        downloads_table: String,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        tracing::info!(
            uploads_table = %uploads_table,
            downloads_table = %downloads_table,
            "DynamoDB metadata tracker configured"
        );

        Self::new(
            Client::from_conf(builder.build()),
            uploads_table,
            downloads_table,
        )
    }
}

fn store_error<E>(operation: &str, err: E) -> AppError
where
    E: std::error::Error + 'static,
{
    let message = format!("{} failed: {}", operation, DisplayErrorContext(&err));
    tracing::error!(error = %message, "DynamoDB request failed");
    AppError::MetadataStore(message)
}

fn record_to_item(record: &UploadRecord) -> Item {
    HashMap::from([
        (ATTR_KEY.to_string(), AttributeValue::S(record.key.clone())),
        (
            ATTR_ORIGINAL_NAME.to_string(),
            AttributeValue::S(record.original_name.clone()),
        ),
        (
            ATTR_SIZE_BYTES.to_string(),
            AttributeValue::N(record.size_bytes.to_string()),
        ),
        (
            ATTR_CONTENT_TYPE.to_string(),
            AttributeValue::S(record.content_type.clone()),
        ),
        (
            ATTR_UPLOADED_AT.to_string(),
            AttributeValue::S(record.uploaded_at.to_rfc3339()),
        ),
        (
            ATTR_UPLOADED_BY.to_string(),
            AttributeValue::S(record.uploaded_by.clone()),
        ),
    ])
}

fn event_to_item(event: &DownloadEvent) -> Item {
    HashMap::from([
        (
            ATTR_EVENT_ID.to_string(),
            AttributeValue::S(Uuid::new_v4().to_string()),
        ),
        (ATTR_KEY.to_string(), AttributeValue::S(event.key.clone())),
        (
            ATTR_DOWNLOADED_AT.to_string(),
            AttributeValue::S(event.downloaded_at.to_rfc3339()),
        ),
        (
            ATTR_DOWNLOADED_BY.to_string(),
            AttributeValue::S(event.downloaded_by.clone()),
        ),
    ])
}

fn string_attr(item: &Item, name: &str) -> Result<String, AppError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| AppError::MetadataStore(format!("item is missing string attribute {}", name)))
}

fn item_to_record(item: &Item) -> Result<UploadRecord, AppError> {
    let size_bytes = item
        .get(ATTR_SIZE_BYTES)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<u64>().ok())
        .ok_or_else(|| {
            AppError::MetadataStore(format!("item is missing numeric attribute {}", ATTR_SIZE_BYTES))
        })?;

    let uploaded_at = DateTime::parse_from_rfc3339(&string_attr(item, ATTR_UPLOADED_AT)?)
        .map_err(|e| AppError::MetadataStore(format!("invalid {}: {}", ATTR_UPLOADED_AT, e)))?
        .with_timezone(&Utc);

    Ok(UploadRecord {
        key: string_attr(item, ATTR_KEY)?,
        original_name: string_attr(item, ATTR_ORIGINAL_NAME)?,
        size_bytes,
        content_type: string_attr(item, ATTR_CONTENT_TYPE)?,
        uploaded_at,
        uploaded_by: string_attr(item, ATTR_UPLOADED_BY)?,
    })
}

#[async_trait::async_trait]
impl MetadataTracker for DynamoMetadataTracker {
    #[tracing::instrument(skip(self, record), fields(db.system = "dynamodb", db.table = %self.uploads_table, key = %record.key))]
    async fn track_upload(&self, record: &UploadRecord) -> Result<(), AppError> {
        self.client
            .put_item()
            .table_name(&self.uploads_table)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| store_error("PutItem", e))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, event), fields(db.system = "dynamodb", db.table = %self.downloads_table, key = %event.key))]
    async fn track_download(&self, event: &DownloadEvent) -> Result<(), AppError> {
        self.client
            .put_item()
            .table_name(&self.downloads_table)
            .set_item(Some(event_to_item(event)))
            .send()
            .await
            .map_err(|e| store_error("PutItem", e))?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.system = "dynamodb", db.table = %self.uploads_table))]
    async fn get_metadata(&self, key: &str) -> Result<Option<UploadRecord>, AppError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.uploads_table)
            .key(ATTR_KEY, AttributeValue::S(key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| store_error("GetItem", e))?;

        output.item().map(item_to_record).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.system = "dynamodb", db.table = %self.uploads_table))]
    async fn remove_metadata(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_item()
            .table_name(&self.uploads_table)
            .key(ATTR_KEY, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| store_error("DeleteItem", e))?;

        Ok(())
    }

    /// Full table scan, then a client-side sort. Corrupt items are skipped.
    #[tracing::instrument(skip(self), fields(db.system = "dynamodb", db.table = %self.uploads_table))]
    async fn recent_uploads(&self, limit: usize) -> Result<Vec<UploadRecord>, AppError> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.uploads_table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| store_error("Scan", e))?;

            for item in output.items() {
                match item_to_record(item) {
                    Ok(record) => records.push(record),
                    Err(e) => tracing::warn!(error = %e, "Skipping unreadable upload item"),
                }
            }

            match output.last_evaluated_key() {
                Some(last) if !last.is_empty() => start_key = Some(last.clone()),
                _ => break,
            }
        }

        Ok(newest_first(records, limit))
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::DynamoDb
    }
}

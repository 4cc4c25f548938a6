use crate::config::RecorderConfig;
use crate::model::EnvironmentRecord;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client as DynamoClient;
use serde_dynamo::{from_items, to_item};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Raised by the underlying store client.
    #[error("{0}")]
    Backend(String),
    #[error("failed to encode record: {0}")]
    Encode(String),
    #[error("failed to decode stored item: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn backend<E: std::error::Error>(err: E) -> Self {
        Self::Backend(DisplayErrorContext(err).to_string())
    }
}

/// Single-table persistence for environment records.
#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    /// Inserts the record or fully replaces the one with the same id.
    async fn put(&self, record: EnvironmentRecord) -> Result<(), StoreError>;

    /// Every stored record, in store-defined order.
    async fn scan(&self) -> Result<Vec<EnvironmentRecord>, StoreError>;
}

pub struct DynamoEnvironmentStore {
    client: DynamoClient,
    table_name: String,
    consistent_read: bool,
}

impl DynamoEnvironmentStore {
    pub fn new(client: DynamoClient, config: &RecorderConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            consistent_read: config.consistent_read,
        }
    }

    pub async fn from_config(config: &RecorderConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(DynamoClient::new(&sdk_config), config)
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl EnvironmentStore for DynamoEnvironmentStore {
    async fn put(&self, record: EnvironmentRecord) -> Result<(), StoreError> {
        let item = to_item(&record).map_err(|e| StoreError::Encode(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(StoreError::backend)?;

        Ok(())
    }

    async fn scan(&self) -> Result<Vec<EnvironmentRecord>, StoreError> {
        let mut records = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .consistent_read(self.consistent_read)
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .map_err(StoreError::backend)?;

            if let Some(items) = result.items {
                let page: Vec<EnvironmentRecord> =
                    from_items(items).map_err(|e| StoreError::Decode(e.to_string()))?;
                debug!("Scanned page of {} records", page.len());
                records.extend(page);
            }

            if result.last_evaluated_key.is_none() {
                break;
            }

            last_evaluated_key = result.last_evaluated_key;
        }

        Ok(records)
    }
}

/// Process-local store used by tests.
#[derive(Default, Clone)]
pub struct InMemoryEnvironmentStore {
    records: Arc<Mutex<HashMap<String, EnvironmentRecord>>>,
}

impl InMemoryEnvironmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, environment_id: &str) -> Option<EnvironmentRecord> {
        self.records.lock().ok()?.get(environment_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EnvironmentStore for InMemoryEnvironmentStore {
    async fn put(&self, record: EnvironmentRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))?
            .insert(record.environment_id.clone(), record);

        Ok(())
    }

    async fn scan(&self) -> Result<Vec<EnvironmentRecord>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))?;

        Ok(guard.values().cloned().collect())
    }
}

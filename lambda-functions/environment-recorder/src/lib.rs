pub mod config;
pub mod http;
pub mod model;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};

pub use config::RecorderConfig;
pub use http::{HttpMethod, HttpResponse, InboundEvent};
pub use model::{EnvironmentInput, EnvironmentRecord, InputError};
pub use store::{DynamoEnvironmentStore, EnvironmentStore, InMemoryEnvironmentStore, StoreError};

pub const RECORDED_MESSAGE: &str = "Environment recorded successfully";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordedResponse {
    pub message: String,
    pub environment_id: String,
}

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),
    #[error("Invalid request body")]
    InvalidBody(#[from] InputError),
    #[error("DynamoDB operation failed")]
    Store(#[from] StoreError),
    #[error("Unexpected error occurred")]
    Unexpected(String),
}

impl RecorderError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed(_) => 405,
            Self::InvalidBody(_) => 400,
            Self::Store(_) | Self::Unexpected(_) => 500,
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            Self::MethodNotAllowed(_) => None,
            Self::InvalidBody(e) => Some(e.to_string()),
            Self::Store(e) => Some(e.to_string()),
            Self::Unexpected(details) => Some(details.clone()),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let body = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };

        HttpResponse::with_body(self.status_code(), body.to_string())
    }
}

/// Records and lists environment lifecycle entries over a single table.
pub struct EnvironmentRecorder<S> {
    store: S,
}

impl<S: EnvironmentStore> EnvironmentRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decodes a raw invocation payload before handling it. An envelope whose
    /// fields have the wrong JSON types is answered with a 500.
    pub async fn handle_value(&self, payload: Value) -> HttpResponse {
        match serde_json::from_value::<InboundEvent>(payload) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                error!(error = %e, "Malformed event envelope");
                RecorderError::Unexpected(e.to_string()).into_response()
            }
        }
    }

    /// Never fails: every error becomes an HTTP-shaped response.
    pub async fn handle(&self, event: InboundEvent) -> HttpResponse {
        let method = event.method();
        info!(method = %method, path = %event.path(), "Handling request");

        match self.dispatch(method, event.body.as_deref()).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    RecorderError::MethodNotAllowed(method) => {
                        info!(method = %method, "Rejected unsupported method")
                    }
                    RecorderError::InvalidBody(e) => warn!(error = %e, "Invalid request body"),
                    RecorderError::Store(e) => error!(error = %e, "DynamoDB error"),
                    RecorderError::Unexpected(e) => error!(error = %e, "General error"),
                }
                err.into_response()
            }
        }
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        body: Option<&str>,
    ) -> Result<HttpResponse, RecorderError> {
        match method {
            HttpMethod::Post => {
                let record = self.record(body, Utc::now()).await?;
                let payload = RecordedResponse {
                    message: RECORDED_MESSAGE.to_string(),
                    environment_id: record.environment_id,
                };
                HttpResponse::json(200, &payload)
                    .map_err(|e| RecorderError::Unexpected(e.to_string()))
            }
            HttpMethod::Get => {
                let records = self.list().await?;
                HttpResponse::json(200, &records)
                    .map_err(|e| RecorderError::Unexpected(e.to_string()))
            }
            HttpMethod::Other(method) => Err(RecorderError::MethodNotAllowed(method)),
        }
    }

    /// Resolves defaults from `body` and upserts the record stamped at `now`.
    pub async fn record(
        &self,
        body: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<EnvironmentRecord, RecorderError> {
        let record = EnvironmentInput::from_body(body)?.into_record(now);

        self.store.put(record.clone()).await?;
        info!(environment_id = %record.environment_id, status = %record.status, "Recorded environment");

        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<EnvironmentRecord>, RecorderError> {
        let records = self.store.scan().await?;
        info!(count = records.len(), "Listed environments");
        Ok(records)
    }
}

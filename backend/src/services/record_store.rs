//! Record store client (PocketBase-compatible REST API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::RecordStoreConnection;
use crate::models::{RecordPage, SvgRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    /// The store answered with a non-success status and an error body
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to connect to record store: {0}")]
    Connection(String),

    #[error("Invalid record store response: {0}")]
    InvalidResponse(String),
}

/// Collection-scoped create/read operations
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, collection: &str, payload: &Value) -> Result<SvgRecord, StoreError>;

    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<SvgRecord, StoreError>;
}

/// Error body returned by PocketBase: `{code, message, data}`
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    message: String,
}

pub struct PocketBaseClient {
    http_client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl PocketBaseClient {
    pub fn new(connection: &RecordStoreConnection) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(connection.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: connection.base_url.trim_end_matches('/').to_string(),
            auth_token: connection.auth_token.clone(),
        }
    }

    fn records_url(&self, collection: &str) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) if !token.is_empty() => builder.header("Authorization", token),
            _ => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, StoreError> {
        let response = self.authorize(builder).send().await.map_err(|e| {
            tracing::error!("Record store request failed: {}", e);
            StoreError::Connection(e.to_string())
        })?;

        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StoreErrorBody>(&text)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP status: {}", status));
        tracing::warn!("Record store returned {}: {}", status, message);

        if status == StatusCode::NOT_FOUND {
            Err(StoreError::NotFound(message))
        } else {
            Err(StoreError::Rejected { status: status.as_u16(), message })
        }
    }
}

#[async_trait]
impl RecordStore for PocketBaseClient {
    async fn create(&self, collection: &str, payload: &Value) -> Result<SvgRecord, StoreError> {
        tracing::debug!("Creating record in collection '{}'", collection);
        let builder = self.http_client.post(self.records_url(collection)).json(payload);
        self.send(builder).await
    }

    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RecordPage, StoreError> {
        tracing::debug!("Listing '{}' page={} per_page={}", collection, page, per_page);
        let builder = self.http_client.get(self.records_url(collection)).query(&[
            ("page", page.to_string()),
            ("perPage", per_page.to_string()),
            ("sort", "-created".to_string()),
        ]);
        self.send(builder).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<SvgRecord, StoreError> {
        let url = format!("{}/{}", self.records_url(collection), urlencoding::encode(id));
        self.send(self.http_client.get(url)).await
    }
}

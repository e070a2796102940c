pub mod engine;
pub mod error;
pub mod types;

pub use engine::LcaEngine;
pub use error::{OpenLcaError, Result};
pub use types::{DescriptorQuery, JsonRpcRequest, ProcessDescriptor};

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Default address of the OpenLCA IPC server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const DATABASES_TIMEOUT: Duration = Duration::from_secs(5);
pub const DESCRIPTORS_TIMEOUT: Duration = Duration::from_secs(10);
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the OpenLCA IPC server's REST and JSON-RPC endpoints.
///
/// Every call is a single attempt with its own timeout. Responses are
/// decoded into the expected shape here so callers never see raw parse errors.
#[derive(Clone)]
pub struct OpenLcaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLcaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List database names via `GET /databases`.
    pub async fn databases(&self, timeout: Duration) -> Result<Vec<String>> {
        let url = format!("{}/databases", self.base_url);
        let resp = self.client.get(&url).timeout(timeout).send().await?;
        let databases: Vec<String> = read_json(resp).await?;
        tracing::debug!(count = databases.len(), "Fetched OpenLCA databases");
        Ok(databases)
    }

    /// Fetch all process descriptors of the active database.
    pub async fn process_descriptors(&self) -> Result<Vec<ProcessDescriptor>> {
        let url = format!("{}/data/get/descriptors", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&DescriptorQuery::processes())
            .timeout(DESCRIPTORS_TIMEOUT)
            .send()
            .await?;
        let processes: Vec<ProcessDescriptor> = read_json(resp).await?;
        tracing::debug!(count = processes.len(), "Fetched OpenLCA process descriptors");
        Ok(processes)
    }

    /// Fetch metadata for one database via `GET /database/{name}`.
    pub async fn database_info(&self, name: &str) -> Result<serde_json::Value> {
        let url = format!("{}/database/{}", self.base_url, urlencoding::encode(name));
        let resp = self
            .client
            .get(&url)
            .timeout(DATABASES_TIMEOUT)
            .send()
            .await?;
        read_json(resp).await
    }

    /// POST a JSON-RPC request to the server root and return the raw reply body.
    pub async fn json_rpc(
        &self,
        request: &JsonRpcRequest,
        timeout: Duration,
    ) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(&self.base_url)
            .json(request)
            .timeout(timeout)
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Require a 200 and decode the body as `T`.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status != StatusCode::OK {
        let message = resp.text().await.unwrap_or_default();
        return Err(OpenLcaError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

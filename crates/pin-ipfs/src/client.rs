//! Storage client traits and the IPFS HTTP API implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StorageError;

/// A connectable storage network client.
///
/// Shared via `Arc<dyn StorageClient>` across requests; each request opens
/// its own session.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Open a connection to the storage node.
    ///
    /// Implementations must verify reachability here so that a down node
    /// surfaces as [`StorageError::Unreachable`] before any add is
    /// attempted.
    async fn connect(&self) -> Result<Box<dyn StorageSession>, StorageError>;
}

/// A per-operation connection to the storage node.
///
/// Dropped at the end of the request scope, success or failure, which
/// closes the underlying transport.
#[async_trait]
pub trait StorageSession: Send + Sync + std::fmt::Debug {
    /// Submit a byte stream and return the CID addressing it.
    async fn add_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StorageError>;

    /// Submit a local file and return the CID addressing its contents.
    async fn add_file(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        self.add_bytes(file_name, bytes).await
    }
}

/// Configuration for the IPFS HTTP API adapter.
#[derive(Debug, Clone)]
pub struct IpfsConfig {
    /// Base URL of the node's HTTP API (e.g. `http://127.0.0.1:5001`).
    pub api_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl IpfsConfig {
    /// Create a new configuration with the default timeout.
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout_secs: 30,
        }
    }

    /// Read the node address from `IPFS_API_URL`, defaulting to a local
    /// daemon.
    pub fn from_env() -> Self {
        let url = std::env::var("IPFS_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5001".to_string());
        Self::new(url)
    }
}

/// Client for a real IPFS node over its `/api/v0` HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsApi {
    config: IpfsConfig,
}

impl IpfsApi {
    pub fn new(config: IpfsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StorageClient for IpfsApi {
    async fn connect(&self) -> Result<Box<dyn StorageSession>, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Unreachable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        // The kubo API only accepts POST, including for the version probe.
        let endpoint = format!("{}/api/v0/version", self.config.api_url);
        let resp = client
            .post(&endpoint)
            .send()
            .await
            .map_err(|e| StorageError::Unreachable {
                reason: format!("{endpoint}: {e}"),
            })?;

        if !resp.status().is_success() {
            return Err(StorageError::Unreachable {
                reason: format!("{endpoint}: HTTP {}", resp.status()),
            });
        }

        if let Ok(version) = resp.json::<VersionResponse>().await {
            tracing::debug!(version = %version.version, "connected to IPFS node");
        }

        Ok(Box::new(IpfsSession {
            client,
            api_url: self.config.api_url.clone(),
        }))
    }
}

/// An open connection to an IPFS node. Dropping it closes the transport.
#[derive(Debug)]
struct IpfsSession {
    client: reqwest::Client,
    api_url: String,
}

#[async_trait]
impl StorageSession for IpfsSession {
    async fn add_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let endpoint = format!("{}/api/v0/add", self.api_url);

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|source| StorageError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StorageError::Api {
                endpoint,
                status,
                body,
            });
        }

        let added: AddResponse =
            resp.json()
                .await
                .map_err(|source| StorageError::Deserialization {
                    endpoint: endpoint.clone(),
                    source,
                })?;

        tracing::debug!(cid = %added.hash, size = %added.size, "added object to IPFS");
        Ok(added.hash)
    }
}

/// Response from `/api/v0/add`.
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size", default)]
    size: String,
}

/// Response from `/api/v0/version`.
#[derive(Debug, Deserialize)]
struct VersionResponse {
    #[serde(rename = "Version")]
    version: String,
}

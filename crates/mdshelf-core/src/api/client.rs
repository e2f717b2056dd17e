//! HTTP client for the Markdown catalog server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path of the list endpoint, relative to the base URL
const LIST_PATH: &str = "get_markdown";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Source of remote documents consumed by the sync reconciler.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Names of every document the remote side currently offers.
    async fn list_document_names(&self) -> Result<Vec<String>, ApiError>;

    /// Raw Markdown body of one document.
    async fn fetch_document(&self, name: &str) -> Result<String, ApiError>;
}

/// Catalog client over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the server named in `config`.
    /// Build a new one when the base URL changes.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list_url(&self) -> String {
        format!("{}/{}", self.base_url, LIST_PATH)
    }

    /// Document URL with `name` percent-encoded as a single path segment.
    pub fn document_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.base_url, LIST_PATH, urlencoding::encode(name))
    }

    /// GET a URL and return the body bytes, mapping non-2xx to an error.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!(url = url, "GET");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn list_document_names(&self) -> Result<Vec<String>, ApiError> {
        let bytes = self.get_bytes(&self.list_url()).await?;
        let names: Vec<String> = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("document list: {}", e)))?;
        debug!(count = names.len(), "Document list received");
        Ok(names)
    }

    async fn fetch_document(&self, name: &str) -> Result<String, ApiError> {
        let bytes = self.get_bytes(&self.document_url(name)).await?;
        String::from_utf8(bytes).map_err(|e| ApiError::Decode(format!("{}: {}", name, e)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> CatalogClient {
        let config = Config {
            base_url: base_url.to_string(),
        };
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_list_url() {
        let client = client_for("http://localhost:8081");
        assert_eq!(client.list_url(), "http://localhost:8081/get_markdown");
    }

    #[test]
    fn test_trailing_slash_on_base_url_is_ignored() {
        let client = client_for("http://localhost:8081/");
        assert_eq!(client.base_url(), "http://localhost:8081");
        assert_eq!(client.document_url("a.md"), "http://localhost:8081/get_markdown/a.md");
    }

    #[test]
    fn test_document_url_percent_encodes_name() {
        let client = client_for("http://localhost:8081");
        assert_eq!(
            client.document_url("my notes.md"),
            "http://localhost:8081/get_markdown/my%20notes.md"
        );
        assert_eq!(
            client.document_url("dir/a.md"),
            "http://localhost:8081/get_markdown/dir%2Fa.md"
        );
        assert_eq!(
            client.document_url("メモ.md"),
            "http://localhost:8081/get_markdown/%E3%83%A1%E3%83%A2.md"
        );
    }
}

//! HTTP source for the pipeline backend's monitoring API.
//!
//! ## Example
//!
//! ```rust,no_run
//! use collectwatch::{DashboardSource, HttpSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSource::builder()
//!         .endpoint("http://localhost:8000")
//!         .build()?;
//!
//!     let health = source.fetch_health().await?;
//!     println!("overall score: {}", health.overall_score);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    AlertPayload, CollectionStatusPayload, DashboardSource, HealthPayload, QualityPayload,
};
use crate::error::FetchError;

/// Request paths of the four endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EndpointPaths {
    pub health: String,
    pub quality: String,
    pub collection_status: String,
    pub alerts: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            health: "/api/health".to_string(),
            quality: "/api/quality".to_string(),
            collection_status: "/api/collection-status".to_string(),
            alerts: "/api/alerts".to_string(),
        }
    }
}

/// Source that pulls each section with a plain `GET`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: String,
    paths: EndpointPaths,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// Base URL all paths are resolved against.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full URL for a request path.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.endpoint, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Parse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl DashboardSource for HttpSource {
    async fn fetch_health(&self) -> Result<HealthPayload, FetchError> {
        self.get_json(&self.paths.health).await
    }

    async fn fetch_quality(&self) -> Result<QualityPayload, FetchError> {
        self.get_json(&self.paths.quality).await
    }

    async fn fetch_collection_status(&self) -> Result<Vec<CollectionStatusPayload>, FetchError> {
        self.get_json(&self.paths.collection_status).await
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertPayload>, FetchError> {
        self.get_json(&self.paths.alerts).await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpSource.
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    endpoint: Option<String>,
    paths: Option<EndpointPaths>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the backend base URL (e.g., "http://localhost:8000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the endpoint paths.
    pub fn paths(mut self, paths: EndpointPaths) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Set the per-request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> Result<HttpSource, FetchError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        let description = format!("http: {}", endpoint);

        Ok(HttpSource {
            client,
            endpoint,
            paths: self.paths.unwrap_or_default(),
            description,
        })
    }
}

// Join a base URL and a path with exactly one slash between them
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let source = HttpSource::builder().build().unwrap();
        assert_eq!(source.endpoint(), "http://localhost:8000");
        assert_eq!(source.paths, EndpointPaths::default());
        assert_eq!(source.description(), "http: http://localhost:8000");
    }

    #[test]
    fn test_builder_custom() {
        let paths = EndpointPaths {
            alerts: "/v2/alerts".to_string(),
            ..EndpointPaths::default()
        };
        let source = HttpSource::builder()
            .endpoint("http://pipeline.local:5000/")
            .paths(paths)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(source.url(&source.paths.alerts), "http://pipeline.local:5000/v2/alerts");
        assert_eq!(
            source.url(&source.paths.health),
            "http://pipeline.local:5000/api/health"
        );
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://a", "/b"), "http://a/b");
        assert_eq!(join_url("http://a/", "b"), "http://a/b");
        assert_eq!(join_url("http://a/", "/b"), "http://a/b");
        assert_eq!(join_url("http://a/prefix", "api/x"), "http://a/prefix/api/x");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_fetch_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpSource::builder()
            .endpoint(format!("http://{}", addr))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert!(source.fetch_health().await.is_err());
        assert!(source.fetch_alerts().await.is_err());
    }
}

// HTTP result source - reads run files from the results host
use crate::application::result_source::{ResultSource, SourceError};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResultSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpResultSource {
    pub fn new(base_url: String, timeout_secs: Option<u64>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ResultSource for HttpResultSource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        let request_error = |e: reqwest::Error| SourceError::Request {
            path: path.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(self.url_for(path))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(request_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::net::SocketAddr;

    async fn serve_results() -> SocketAddr {
        let router = Router::new()
            .route("/beta/run.txt", get(|| async { "Ran 12 tests in 0.1s\n" }))
            .route("/beta/timestamp.txt", get(|| async { "2024-06-01 12:00:00\n" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_fetch_text() {
        let addr = serve_results().await;
        let source = HttpResultSource::new(format!("http://{addr}/"), Some(5)).unwrap();

        let body = source.fetch_text("/beta/run.txt").await.unwrap();
        assert_eq!(body, "Ran 12 tests in 0.1s\n");
    }

    #[tokio::test]
    async fn test_base_url_without_trailing_slash() {
        let addr = serve_results().await;
        let source = HttpResultSource::new(format!("http://{addr}"), None).unwrap();

        let body = source.fetch_text("/beta/timestamp.txt").await.unwrap();
        assert_eq!(body, "2024-06-01 12:00:00\n");
    }

    #[tokio::test]
    async fn test_missing_resource_is_status_error() {
        let addr = serve_results().await;
        let source = HttpResultSource::new(format!("http://{addr}"), None).unwrap();

        let err = source.fetch_text("/beta/result.txt").await.unwrap_err();
        assert_eq!(
            err,
            SourceError::Status {
                path: "/beta/result.txt".to_string(),
                status: 404
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let source = HttpResultSource::new(format!("http://{addr}"), Some(2)).unwrap();

        let err = source.fetch_text("/beta/run.txt").await.unwrap_err();
        assert!(matches!(err, SourceError::Request { .. }));
    }
}

// Source trait for the text resources a test run publishes
use async_trait::async_trait;
use thiserror::Error;

pub const TIMESTAMP_FILE: &str = "timestamp.txt";
pub const RUN_FILE: &str = "run.txt";
pub const RESULT_FILE: &str = "result.txt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("request for {path} failed: {message}")]
    Request { path: String, message: String },
    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },
}

#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Fetch the body of a resource such as `/beta/run.txt`
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError>;
}

/// Path of a panel's resource, with the panel name as one encoded segment
pub fn resource_path(name: &str, file: &str) -> String {
    format!("/{}/{}", urlencoding::encode(name), file)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path() {
        assert_eq!(resource_path("beta", RUN_FILE), "/beta/run.txt");
        assert_eq!(
            resource_path("nightly build", TIMESTAMP_FILE),
            "/nightly%20build/timestamp.txt"
        );
    }
}

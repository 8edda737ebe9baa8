use crate::domain::model::SearchPayload;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Patent search backend. The HTTP adapter talks to the USPTO ODP API;
/// tests substitute canned responses.
#[async_trait]
pub trait PatentApi: Send + Sync {
    /// Runs a search and returns the raw JSON response body.
    async fn search(&self, payload: &SearchPayload) -> Result<serde_json::Value>;

    /// Sends a one-record probe query and returns a status message.
    async fn test_connection(&self) -> Result<String>;
}

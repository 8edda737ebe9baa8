use crate::config::ApiConfig;
use crate::domain::model::SearchPayload;
use crate::domain::ports::PatentApi;
use crate::utils::error::{PatentError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// ODP API 的 HTTP client，內建 429 重試
pub struct UsptoClient {
    client: Client,
    config: ApiConfig,
}

impl UsptoClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<String> {
        self.config
            .resolved_api_key()
            .ok_or_else(|| PatentError::MissingConfigError {
                field: "api.api_key".to_string(),
            })
    }

    /// POST with retry: 429 waits for `Retry-After` (or the configured delay)
    /// and transport errors wait the configured delay. The last attempt
    /// returns whatever it got.
    async fn post_with_retry(&self, body: &serde_json::Value) -> Result<serde_json::Value> {
        let api_key = self.api_key()?;
        let url = &self.config.search_url;
        let max_attempts = self.config.retry_attempts.max(1);
        let retry_delay = self.config.retry_delay_seconds;

        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::info!(
                "📡 Making API request to {} (attempt {}/{})",
                url,
                attempt,
                max_attempts
            );

            let result = self
                .client
                .post(url)
                .header("X-API-KEY", &api_key)
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    tracing::info!("API response status: {}", status);

                    if status == StatusCode::TOO_MANY_REQUESTS && attempt < max_attempts {
                        let retry_after = response
                            .headers()
                            .get(reqwest::header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.trim().parse::<u64>().ok())
                            .unwrap_or(retry_delay)
                            .min(self.config.max_retry_wait_seconds);
                        tracing::warn!("⏳ Rate limited. Retrying after {} seconds", retry_after);
                        tokio::time::sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }

                    if status == StatusCode::OK {
                        let text = response.text().await?;
                        return serde_json::from_str(&text).map_err(|e| {
                            tracing::error!("❌ Error parsing API response: {}", e);
                            PatentError::ApiError {
                                status: Some(status.as_u16()),
                                message: format!("Error parsing API response: {}", e),
                            }
                        });
                    }

                    let body = response.text().await.unwrap_or_default();
                    let err = api_status_error(status, &body);
                    tracing::error!("❌ {}", err);
                    return Err(err);
                }
                Err(e) => {
                    tracing::error!("❌ Request exception: {}", e);
                    if attempt < max_attempts {
                        tracing::info!("Retrying in {} seconds", retry_delay);
                        tokio::time::sleep(Duration::from_secs(retry_delay)).await;
                        continue;
                    }
                    return Err(PatentError::HttpError(e));
                }
            }
        }
    }
}

fn api_status_error(status: StatusCode, body: &str) -> PatentError {
    let mut message = format!("API error: {}", status.as_u16());
    let snippet: String = body.chars().take(200).collect();
    if !snippet.is_empty() {
        message.push_str(" - ");
        message.push_str(&snippet);
    }
    PatentError::ApiError {
        status: Some(status.as_u16()),
        message,
    }
}

/// 連線測試用的單筆查詢
fn probe_payload() -> serde_json::Value {
    serde_json::json!({
        "q": "applicationMetaData.applicationTypeLabelName:Utility",
        "filters": [
            {
                "name": "applicationMetaData.applicationStatusDescriptionText",
                "value": ["Patented Case"]
            }
        ],
        "pagination": {"offset": 0, "limit": 1},
        "fields": ["applicationNumberText", "applicationMetaData.filingDate"]
    })
}

#[async_trait]
impl PatentApi for UsptoClient {
    async fn search(&self, payload: &SearchPayload) -> Result<serde_json::Value> {
        let body = serde_json::to_value(payload)?;
        self.post_with_retry(&body).await
    }

    async fn test_connection(&self) -> Result<String> {
        let api_key = self.api_key()?;
        let url = &self.config.search_url;
        tracing::info!("🔌 Testing API connection to: {}", url);

        let response = self
            .client
            .post(url)
            .header("X-API-KEY", &api_key)
            .json(&probe_payload())
            .send()
            .await?;

        let status = response.status();
        tracing::info!("Test connection status: {}", status);

        match status {
            StatusCode::OK => match response.json::<serde_json::Value>().await {
                Ok(data) => {
                    let total = data.get("count").and_then(|v| v.as_u64()).unwrap_or(0);
                    tracing::info!("✅ API test successful: {} total results", total);
                    Ok(format!(
                        "API connection successful. Found {} matching patents.",
                        total
                    ))
                }
                Err(e) => {
                    tracing::warn!("Error parsing API response: {}", e);
                    Ok("API connection successful, but error parsing response".to_string())
                }
            },
            StatusCode::FORBIDDEN => Err(PatentError::ApiError {
                status: Some(403),
                message: "API Key is invalid or unauthorized".to_string(),
            }),
            StatusCode::NOT_FOUND => Err(PatentError::ApiError {
                status: Some(404),
                message: "No matching records found or invalid endpoint".to_string(),
            }),
            other => {
                let body = response.text().await.unwrap_or_default();
                Err(api_status_error(other, &body))
            }
        }
    }
}

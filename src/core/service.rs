use crate::config::SearchConfig;
use crate::core::export::format_results_for_csv;
use crate::core::payload::build_search_payload;
use crate::domain::model::{ExportRequest, SearchOutcome, SearchPayload, SearchRequest};
use crate::domain::ports::PatentApi;
use crate::utils::error::{PatentError, Result};
use crate::utils::validation::validate_search_request;
use serde_json::{json, Value};
use std::sync::Arc;

/// 搜尋、匯出與連線測試的進入點
#[derive(Clone)]
pub struct PatentService {
    api: Arc<dyn PatentApi>,
    settings: SearchConfig,
}

impl PatentService {
    pub fn new(api: Arc<dyn PatentApi>, settings: SearchConfig) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    /// Validates the request and builds the payload without calling the API.
    pub fn preview_query(&self, request: &SearchRequest) -> Result<SearchPayload> {
        let search_type = validate_search_request(request, &self.settings)?;
        Ok(build_search_payload(search_type, request, &self.settings))
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let query = self.preview_query(request)?;
        tracing::info!("🔍 Running {} search: q={}", request.search_type, query.q);

        let mut data = self.api.search(&query).await?;

        let Value::Object(map) = &mut data else {
            return Err(PatentError::ApiError {
                status: None,
                message: "Unexpected API response: expected a JSON object".to_string(),
            });
        };
        let results = map
            .get("patentFileWrapperDataBag")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        map.insert("results".to_string(), results);

        let outcome = SearchOutcome { query, data };
        tracing::info!(
            "📊 Search returned {} of {} total results",
            outcome.results().len(),
            outcome.total_count()
        );
        Ok(outcome)
    }

    /// 匯出 CSV：優先使用前端送來的結果，否則重新搜尋
    pub async fn export_csv(&self, request: ExportRequest) -> Result<String> {
        if let Some(results) = request.results {
            tracing::info!("📝 Exporting {} supplied results to CSV", results.len());
            return format_results_for_csv(&results);
        }

        if let Some(mut search_params) = request.search_params {
            search_params.limit = Some(i64::from(self.settings.max_results_per_page));
            let outcome = self.search(&search_params).await?;
            tracing::info!("📝 Exporting {} searched results to CSV", outcome.results().len());
            return format_results_for_csv(outcome.results());
        }

        Err(PatentError::validation(
            "No results or search parameters provided for export",
        ))
    }

    pub async fn test_connection(&self) -> Result<String> {
        self.api.test_connection().await
    }

    /// Dispatches a named operation and returns its success envelope.
    pub async fn run_operation(&self, operation: &str, params: Value) -> Result<Value> {
        tracing::info!("⚙️ Running operation: {}", operation);
        tracing::debug!("Operation params: {}", params);

        let params = if params.is_null() { json!({}) } else { params };

        match operation {
            "search" => {
                let request: SearchRequest = serde_json::from_value(params)?;
                let outcome = self.search(&request).await?;
                Ok(json!({"success": true, "data": outcome.data, "query": outcome.query}))
            }
            "export_csv" => {
                let request: ExportRequest = serde_json::from_value(params)?;
                let csv_data = self.export_csv(request).await?;
                Ok(json!({"success": true, "csv_data": csv_data}))
            }
            "test_connection" => {
                let message = self.test_connection().await?;
                Ok(json!({"success": true, "message": message}))
            }
            other => Err(PatentError::operation(format!(
                "Unknown operation type: {}",
                other
            ))),
        }
    }
}

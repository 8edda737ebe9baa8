pub mod template;

use crate::config::AppConfig;
use crate::core::export::export_filename;
use crate::core::service::PatentService;
use crate::domain::constants::{field_display_name, valid_fields, API_ENDPOINTS, BOOLEAN_OPERATORS};
use crate::domain::model::{ExportRequest, OperationRequest, SearchRequest, SearchType};
use crate::utils::error::{PatentError, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use template::{render_index, IndexContext};

#[derive(Clone)]
pub struct WebState {
    pub service: PatentService,
    pub tool_name: String,
}

impl WebState {
    pub fn new(service: PatentService, config: &AppConfig) -> Self {
        Self {
            service,
            tool_name: config.server.tool_name.clone(),
        }
    }
}

type SharedState = Arc<WebState>;

/// `{"success": false, "error": ...}` with the given status.
fn failure(status: StatusCode, err: &PatentError) -> Response {
    (status, Json(json!({"success": false, "error": err.to_string()}))).into_response()
}

pub fn build_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/search", post(api_search))
        .route("/api/preview-query", post(api_preview_query))
        .route("/api/export-csv", post(api_export_csv))
        .route("/api/valid-fields/{search_type}", get(api_valid_fields))
        .route("/api/test-connection", get(api_test_connection))
        .route("/api/run-operation", post(api_run_operation))
        .route("/api/search-types", get(api_search_types))
        .route("/api/boolean-operators", get(api_boolean_operators))
        .route("/api/endpoints", get(api_endpoints))
        .with_state(Arc::new(state))
}

pub async fn serve(state: WebState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Web UI available at http://{}", addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn index(State(state): State<SharedState>) -> Html<String> {
    let settings = state.service.settings();
    Html(render_index(&IndexContext {
        tool_name: &state.tool_name,
        search_types: &SearchType::ALL,
        max_results: settings.max_results_per_page,
        default_sort_field: &settings.default_sort_field,
    }))
}

async fn api_search(
    State(state): State<SharedState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    tracing::info!(
        "Search request received: {}",
        serde_json::to_string(&request).unwrap_or_default()
    );

    match state.service.search(&request).await {
        Ok(outcome) => {
            Json(json!({"success": true, "data": outcome.data, "query": outcome.query}))
                .into_response()
        }
        Err(e) => {
            tracing::error!("❌ Search failed: {}", e);
            failure(StatusCode::OK, &e)
        }
    }
}

async fn api_preview_query(
    State(state): State<SharedState>,
    Json(request): Json<SearchRequest>,
) -> Response {
    match state.service.preview_query(&request) {
        Ok(query) => Json(json!({"success": true, "query": query})).into_response(),
        Err(e) => failure(StatusCode::OK, &e),
    }
}

async fn api_export_csv(
    State(state): State<SharedState>,
    Json(request): Json<ExportRequest>,
) -> Response {
    tracing::info!("CSV export request received");

    match state.service.export_csv(request).await {
        Ok(csv_data) => {
            let filename = export_filename(chrono::Local::now().naive_local());
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                csv_data,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("❌ CSV export failed: {}", e);
            failure(StatusCode::BAD_REQUEST, &e)
        }
    }
}

async fn api_valid_fields(Path(search_type): Path<String>) -> Response {
    match search_type.parse::<SearchType>() {
        Ok(search_type) => {
            let fields: Vec<Value> = valid_fields(search_type)
                .iter()
                .map(|f| json!({"field": f, "display_name": field_display_name(f)}))
                .collect();
            Json(json!({"success": true, "fields": fields})).into_response()
        }
        Err(e) => failure(StatusCode::BAD_REQUEST, &e),
    }
}

async fn api_test_connection(State(state): State<SharedState>) -> Response {
    match state.service.test_connection().await {
        Ok(message) => Json(json!({"success": true, "message": message})).into_response(),
        Err(e) => {
            tracing::error!("❌ Error testing API connection: {}", e);
            failure(StatusCode::OK, &e)
        }
    }
}

async fn api_run_operation(
    State(state): State<SharedState>,
    Json(request): Json<OperationRequest>,
) -> Response {
    match state
        .service
        .run_operation(&request.operation, request.params)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!("❌ Error in operation {}: {}", request.operation, e);
            failure(StatusCode::OK, &e)
        }
    }
}

async fn api_search_types() -> Json<Value> {
    let types: Vec<Value> = SearchType::ALL
        .iter()
        .map(|t| json!({"type": t.as_str(), "name": t.display_name()}))
        .collect();
    Json(json!({"success": true, "search_types": types}))
}

async fn api_boolean_operators() -> Json<Value> {
    Json(json!({"success": true, "operators": BOOLEAN_OPERATORS}))
}

async fn api_endpoints() -> Json<Value> {
    let endpoints: serde_json::Map<String, Value> = API_ENDPOINTS
        .iter()
        .map(|(name, path)| (name.to_string(), Value::String(path.to_string())))
        .collect();
    Json(json!({"success": true, "endpoints": endpoints}))
}

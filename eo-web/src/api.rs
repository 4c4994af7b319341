use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use eo_data::{list_orders_in, load_order_in, sort_rows, CacheError, ExecutiveOrder, SortKey, SortOrder};

use crate::render;
use crate::state::AppState;
use crate::summarizer::LlmError;
use crate::text_source::resolve_summary_text;

/// Summary shown when no text source is available.
pub const NO_TEXT_PLACEHOLDER: &str = "No text available for summarization.";

/// Errors surfaced to dashboard clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("summarization failed: {0}")]
    Summarize(#[from] LlmError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Cache(CacheError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::NOT_FOUND => self.to_string(),
            _ => "The server encountered an internal error.".to_string(),
        };
        (status, Html(render::render_error(status.as_u16(), &message))).into_response()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// List every cached order, optionally sorted by a date column.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexParams>,
) -> Result<Html<String>, ApiError> {
    let cache_dir = state.cache_dir().to_path_buf();
    let mut rows = tokio::task::spawn_blocking(move || list_orders_in(&cache_dir))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let sort_by = params.sort_by.as_deref().and_then(SortKey::parse);
    let sort_order = SortOrder::parse(params.sort_order.as_deref());
    if let Some(key) = sort_by {
        sort_rows(&mut rows, key, sort_order);
    }

    Ok(Html(render::render_index(&rows, sort_by, sort_order)))
}

/// Load a cached order off the runtime, logging why it could not be served.
async fn load_order(state: &AppState, id: &str) -> Result<ExecutiveOrder, ApiError> {
    let cache_dir = state.cache_dir().to_path_buf();
    let order_id = id.to_string();
    let loaded = tokio::task::spawn_blocking(move || load_order_in(&cache_dir, &order_id))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    loaded.map_err(|e| {
        match &e {
            CacheError::NotFound(_) => error!(order = %id, "requested executive order not found in cache"),
            other => error!(order = %id, error = %other, "error loading executive order"),
        }
        ApiError::from(e)
    })
}

pub async fn order_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let order = load_order(&state, &id).await?;
    info!(order = %id, "loaded executive order details");
    Ok(Html(render::render_detail(&id, &order)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

fn is_script_request(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        == Some("XMLHttpRequest")
}

/// Summarize a cached order.
///
/// Script requests (`X-Requested-With: XMLHttpRequest`) get `{"summary": ...}`;
/// everything else gets a rendered page.
pub async fn summarize_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let order = load_order(&state, &id).await?;

    let summary = match resolve_summary_text(&order, state.raw_text()).await {
        Some(text) => state.summarizer().summarize(&text).await.map_err(|e| {
            error!(order = %id, error = %e, "summarization failed");
            e
        })?,
        None => NO_TEXT_PLACEHOLDER.to_string(),
    };
    info!(order = %id, "summarized executive order");

    if is_script_request(&headers) {
        Ok(Json(SummaryResponse { summary }).into_response())
    } else {
        Ok(Html(render::render_summary(&id, &order, &summary)).into_response())
    }
}

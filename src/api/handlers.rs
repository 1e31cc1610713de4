//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::error::{AppError, Result, ENDPOINT_NOT_FOUND_MESSAGE};
use crate::items::ItemRepository;
use crate::metrics::RequestMetrics;
use crate::models::{
    CacheGetResponse, CacheSetRequest, CacheSetResponse, CreateItemRequest, ErrorResponse,
    HealthResponse, IndexResponse, ItemListResponse, ItemResponse,
};
use crate::store::KvStore;

/// Application state shared across all handlers.
///
/// The store client is built once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    /// Key/value store backing every endpoint
    pub store: Arc<dyn KvStore>,
    /// Item records on top of the same store
    pub items: ItemRepository,
    /// Request metrics exposed at `/metrics`
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            items: ItemRepository::new(store.clone()),
            store,
            metrics: Arc::new(RequestMetrics::new()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Handler for GET /
pub async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse::new())
}

/// Handler for GET /health
///
/// Pings the store; any failure turns into a 503 with the error text.
pub async fn health_handler(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse::healthy(state.metrics.uptime_seconds())),
        )
            .into_response(),
        Err(err) => {
            warn!("Health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy(err.to_string())),
            )
                .into_response()
        }
    }
}

/// Handler for GET /api/cache/{key}
///
/// Store failures are reported with the generic error body.
pub async fn cache_get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CacheGetResponse>> {
    let value = state.store.get(&key).await.map_err(AppError::internal)?;
    // Only a missing or expired key is a miss; a key holding "" is returned.
    let Some(value) = value else {
        return Err(AppError::KeyNotFound(key));
    };
    let ttl = state.store.ttl(&key).await.map_err(AppError::internal)?;

    Ok(Json(CacheGetResponse::new(key, value, ttl)))
}

/// Handler for POST /api/cache/{key}
///
/// Stores the value with the given TTL, or one hour when none is given.
/// A body that is not an object or a TTL the store would refuse ends in the
/// generic error body, like any other store failure on this route.
pub async fn cache_set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CacheSetResponse>)> {
    let Json(body) = payload?;
    let req = CacheSetRequest::from_body(body).map_err(AppError::Internal)?;
    let ttl = req.ttl_secs().map_err(AppError::Internal)?;

    state
        .store
        .set_ex(&key, &req.value_text(), ttl)
        .await
        .map_err(AppError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(CacheSetResponse::new(&key, req.ttl_echo())),
    ))
}

/// Handler for GET /api/items
///
/// Store failures are returned with their message.
pub async fn list_items_handler(State(state): State<AppState>) -> Result<Json<ItemListResponse>> {
    let items = state.items.list().await?;
    Ok(Json(ItemListResponse::new(items)))
}

/// Handler for POST /api/items
pub async fn create_item_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    let Json(body) = payload?;
    let req = CreateItemRequest::from_body(body).map_err(AppError::UnexpectedBody)?;

    let item = state
        .items
        .create(req.name_text(), req.description_text())
        .await?;

    Ok((StatusCode::CREATED, Json(ItemResponse::new(item))))
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics.render_prometheus(),
    )
}

/// Fallback for routes that match nothing.
pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(ENDPOINT_NOT_FOUND_MESSAGE)),
    )
}

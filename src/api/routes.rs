//! API Routes
//!
//! Configures the Axum router with all endpoints and middleware.

use std::any::Any;

use axum::{middleware, response::Response, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use super::handlers::{
    cache_get_handler, cache_set_handler, create_item_handler, health_handler, index_handler,
    list_items_handler, metrics_handler, not_found_handler, AppState,
};
use crate::error::internal_error_response;
use crate::metrics::track_metrics;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Service description
/// - `GET /health` - Store connectivity check
/// - `GET /metrics` - Prometheus metrics
/// - `GET|POST /api/cache/{key}` - Read or write a cache entry
/// - `GET|POST /api/items` - List or create items
///
/// Anything else gets a JSON 404.
pub fn create_router(state: AppState) -> Router {
    with_middleware(api_routes(), state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/cache/{key}",
            get(cache_get_handler).post(cache_set_handler),
        )
        .route(
            "/api/items",
            get(list_items_handler).post(create_item_handler),
        )
        .fallback(not_found_handler)
}

/// Applies the shared middleware stack and binds the state.
///
/// # Middleware
/// - Panic catching: a panicking handler yields the generic 500 body
/// - Metrics: counts and times every request by route template
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_metrics,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Handler panicked: {}", detail);
    internal_error_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::new(Arc::new(MemoryStore::new())))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nonexistent-route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Endpoint not found");
    }

    async fn exploding_handler() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn test_panic_yields_generic_500() {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        let routes = api_routes().route("/boom", get(exploding_handler));
        let app = with_middleware(routes, state);

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_metrics_count_requests() {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        let metrics = state.metrics.clone();
        let app = create_router(state);

        app.clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        app.clone()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(metrics.request_count("/"), 1);
        assert_eq!(metrics.request_count("unmatched"), 1);

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("route=\"/\",status=\"200\"} 1"));
    }
}

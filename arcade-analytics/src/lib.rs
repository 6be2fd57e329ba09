use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use arcade_shared::middleware::{metrics_middleware, ProcessCollector};
use metrics_exporter_prometheus::PrometheusHandle;

pub mod config;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

use store::EventStore;

/// Maximum rows returned by `GET /events`.
pub const RECENT_EVENTS_LIMIT: usize = 25;

/// Byte cap on a `POST /track` body, well above any real event.
pub const DEFAULT_TRACK_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub metrics_handle: PrometheusHandle,
    pub process: ProcessCollector,
    pub track_body_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, metrics_handle: PrometheusHandle) -> Self {
        Self {
            store,
            metrics_handle,
            process: ProcessCollector::new(),
            track_body_limit: DEFAULT_TRACK_BODY_LIMIT,
        }
    }

    pub fn with_track_body_limit(mut self, limit: usize) -> Self {
        self.track_body_limit = limit;
        self
    }
}

/// The collector's HTTP surface. CORS is outermost so pre-flight requests
/// are answered before routing or metrics run.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/track",
            post(routes::track::track_event).layer(DefaultBodyLimit::max(state.track_body_limit)),
        )
        .route("/events", get(routes::events::recent_events))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

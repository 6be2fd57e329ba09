use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::models::Event;
use crate::{AppState, RECENT_EVENTS_LIMIT};

/// GET /events
/// The newest events, newest first. A store failure still answers with a
/// JSON array, just an empty one.
pub async fn recent_events(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Vec<Event>>) {
    match state.store.recent(RECENT_EVENTS_LIMIT).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(rows.into_iter().map(Event::from).collect()),
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to query recent events");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{SubsecRound, Utc};
use metrics::counter;
use std::sync::Arc;

use arcade_shared::errors::{AppError, AppResult};
use arcade_shared::types::{Ack, TrackPayload};

use crate::models::EventRow;
use crate::AppState;

pub const EVENTS_TOTAL: &str = "analytics_events_total";

/// POST /track
/// Validates the payload, stamps it with the collector's clock, and appends
/// one row. A body that does not parse is treated as empty; a body over the
/// route's byte limit is a 413.
pub async fn track_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TrackPayload>, JsonRejection>,
) -> AppResult<Json<Ack>> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(AppError::payload_too_large(state.track_body_limit));
        }
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "unreadable track body");
            TrackPayload::default()
        }
    };

    let missing = payload.missing_required();
    if !missing.is_empty() {
        return Err(AppError::missing_fields(&missing));
    }

    let captured_at = Utc::now().trunc_subsecs(0);
    counter!(EVENTS_TOTAL, "event_type" => payload.event.clone()).increment(1);

    let row = EventRow::capture(payload, captured_at);
    tracing::debug!(session_id = %row.session_id, event = %row.event, path = %row.path, "event captured");

    state.store.insert(row).await.map_err(|e| {
        tracing::error!(error = %e, "failed to store event");
        AppError::storage_write("Failed to track event")
    })?;

    Ok(Json(Ack::ok()))
}

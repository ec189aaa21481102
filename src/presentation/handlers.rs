// HTTP request handlers
use crate::application::chart_backend::HoverEvent;
use crate::application::presenter_service::PresentOptions;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Default)]
pub struct PresentQuery {
    pub window_days: Option<i64>,
    pub smoothing_minutes: Option<i64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Present the current dataset: renders the chart and returns the
/// presentation payload.
pub async fn get_chart(
    Query(query): Query<PresentQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let options = PresentOptions {
        window_days: query.window_days,
        smoothing_minutes: query.smoothing_minutes,
    };
    match state.presenter.present(&options).await {
        Ok(presentation) => Json(presentation).into_response(),
        Err(err) => {
            tracing::error!(%err, "failed to present chart");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Inject a pointer-hover event for the given data point index.
pub async fn trigger_hover(
    Path(index): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    let rendered_points = state.chart_surface.point_count().await.unwrap_or(0);
    if index >= rendered_points {
        return StatusCode::NOT_FOUND;
    }
    match state.hover_events.send(HoverEvent { index }).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(err) => {
            tracing::error!(%err, "hover pipeline is not running");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Serve whatever image the hover pipeline most recently displayed.
pub async fn get_image(State(state): State<Arc<AppState>>) -> Response {
    match state.image_surface.current().await {
        Some(handle) => {
            ([(header::CONTENT_TYPE, handle.content_type)], handle.bytes).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

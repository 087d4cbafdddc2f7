use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    registry::SensorRegistry,
    render::{data_url, ChartRenderer},
    transform::chart_series,
};

pub const INVALID_INDEX_ERROR: &str = "Invalid index";

#[derive(Clone)]
pub struct ChartState {
    pub registry: Arc<SensorRegistry>,
    pub renderer: Arc<dyn ChartRenderer>,
}

/// Chart API: sensor series rendered as a base64 PNG.
pub fn router(state: ChartState) -> Router {
    Router::new()
        .route("/", get(chart_home))
        .route("/senzor/:index", get(sensor_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn chart_home(State(state): State<ChartState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Chart backend running",
        "available_sensors": state.registry.len(),
    }))
}

async fn sensor_chart(State(state): State<ChartState>, Path(index): Path<String>) -> Response {
    metrics::counter!("api_requests_total", "endpoint" => "chart").increment(1);

    let Some(sensor) = state.registry.lookup(&index) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": INVALID_INDEX_ERROR }))).into_response();
    };

    let series = chart_series(sensor);
    match state.renderer.render(&series, sensor.unit()).await {
        Ok(png) => Json(json!({ "plot_url": data_url(&png) })).into_response(),
        Err(e) => {
            metrics::counter!("chart_render_failures_total").increment(1);
            tracing::error!(index = %index, location = sensor.location(), error = %e, "chart rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Chart rendering failed" })),
            )
                .into_response()
        }
    }
}

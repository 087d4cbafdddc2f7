use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{registry::SensorRegistry, transform::format_for_api};

pub const OUT_OF_RANGE_ERROR: &str = "Sensor index out of range";

/// JSON API: sensor series as timestamp/value arrays.
pub fn router(registry: Arc<SensorRegistry>) -> Router {
    Router::new()
        .route("/", get(api_home))
        .route("/api/sensor/:index", get(sensor_data))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

async fn api_home(State(registry): State<Arc<SensorRegistry>>) -> Json<serde_json::Value> {
    let endpoints: Vec<String> = (0..registry.len()).map(|i| format!("/api/sensor/{i}")).collect();
    let sensors: Vec<serde_json::Value> = registry
        .iter()
        .enumerate()
        .map(|(index, s)| {
            json!({
                "index": index,
                "kind": s.kind(),
                "unit": s.unit(),
                "total_records": s.record_count(),
            })
        })
        .collect();

    Json(json!({
        "message": "Sensor API is running.",
        "available_sensors": registry.len(),
        "endpoints": endpoints,
        "sensors": sensors,
    }))
}

// An empty sensor still answers 200; the payload carries the `error` field.
async fn sensor_data(
    State(registry): State<Arc<SensorRegistry>>,
    Path(index): Path<String>,
) -> Response {
    metrics::counter!("api_requests_total", "endpoint" => "sensor").increment(1);

    match registry.lookup(&index) {
        Some(sensor) => Json(format_for_api(sensor)).into_response(),
        None => {
            tracing::debug!(index = %index, "sensor index out of range");
            (StatusCode::NOT_FOUND, Json(json!({ "error": OUT_OF_RANGE_ERROR }))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_records;
    use axum::body::{self, Body};
    use axum::http::Request;
    use sensor_model::domain::Sensor;
    use tower::ServiceExt;

    fn app() -> Router {
        let records = parse_records(
            r#"{"data": [[5, "2024-01-02T10:00:00Z", 12.5], [5, "2024-01-01T09:00:00Z", 10.0]]}"#,
        )
        .unwrap();
        router(Arc::new(SensorRegistry::new(vec![
            Sensor::new("10.json", "PV", "mW", records),
            Sensor::new("11.json", "PV", "mW", Vec::new()),
        ])))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn serves_sensor_payload() {
        let (status, body) = get_json(app(), "/api/sensor/0").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pes_id"], json!(5));
        assert_eq!(body["timestamps"], json!(["2024-01-01T09:00:00Z", "2024-01-02T10:00:00Z"]));
        assert_eq!(body["values"], json!([10.0, 12.5]));
        assert_eq!(body["total_records"], json!(2));
        assert_eq!(body["last_record"], json!([5, "2024-01-02T10:00:00Z", 12.5]));
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn empty_sensor_is_ok_with_error_field() {
        let (status, body) = get_json(app(), "/api/sensor/1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_records"], json!(0));
        assert_eq!(body["error"], json!(crate::transform::NO_RECORDINGS_ERROR));
        assert_eq!(body["last_record"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn out_of_range_index_is_not_found() {
        for uri in [
            "/api/sensor/2",
            "/api/sensor/-1",
            "/api/sensor/99999999999",
            "/api/sensor/99999999999999999999",
        ] {
            let (status, body) = get_json(app(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({ "error": OUT_OF_RANGE_ERROR }));
        }
    }

    #[tokio::test]
    async fn home_lists_endpoints() {
        let (status, body) = get_json(app(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available_sensors"], json!(2));
        assert_eq!(body["endpoints"], json!(["/api/sensor/0", "/api/sensor/1"]));
        assert_eq!(body["sensors"][1]["total_records"], json!(0));
    }

    #[tokio::test]
    async fn allows_cross_origin_requests() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/api/sensor/0")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}

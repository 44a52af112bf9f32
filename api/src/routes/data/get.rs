use axum::{
    Json,
    extract::{Path, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use services::{MetricsError, export_service::ExportService};

use crate::state::AppState;

/// GET /data/pullperformancemetrics
///
/// Allocates the next index number, fetches the RNA payload and replaces the
/// stored rows for that index number.
///
/// ### Responses
/// - `200 OK` → `{ "message": "Performance metrics updated successfully", "index": 42 }`
/// - `500 Internal Server Error` → `{ "error": "Failed to fetch performance metrics" }` when
///   the upstream call fails, or `{ "error": "<detail>" }` when storing fails
pub async fn pull_performance_metrics(
    State(app_state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    match app_state.pulls().pull(app_state.db()).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "message": "Performance metrics updated successfully",
                "index": result.index_no,
            })),
        ),
        Err(MetricsError::FetchFailure(detail)) => {
            tracing::error!("Failed to fetch performance metrics: {detail}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch performance metrics" })),
            )
        }
        Err(e) => {
            tracing::error!("Performance metrics pull failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

/// GET /data/exportcsv/{device_id}
///
/// Exports the newest rows (up to 20000) for `device_id` as a CSV attachment.
///
/// ### Responses
/// - `200 OK` → `text/csv` with
///   `Content-Disposition: attachment; filename=performance_metrics_{device_id}.csv`
/// - `404 Not Found` → `{ "error": "No records found for the given device_id" }`
/// - `500 Internal Server Error` → `{ "error": "<detail>" }`
pub async fn export_performance_metrics_csv(
    State(app_state): State<AppState>,
    Path(device_id): Path<String>,
) -> Response {
    match ExportService::export_csv(app_state.db(), &device_id).await {
        Ok(doc) => {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
            let disposition = HeaderValue::from_str(&format!("attachment; filename={}", doc.filename))
                .unwrap_or_else(|_| {
                    HeaderValue::from_static("attachment; filename=performance_metrics.csv")
                });
            headers.insert(CONTENT_DISPOSITION, disposition);

            (headers, doc.body).into_response()
        }
        Err(MetricsError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No records found for the given device_id" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(device_id, "CSV export failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

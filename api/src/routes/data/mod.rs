use axum::{Router, routing::get};

use crate::state::AppState;

pub mod get;

pub fn data_routes() -> Router<AppState> {
    Router::new()
        .route("/pullperformancemetrics", get(get::pull_performance_metrics))
        .route("/exportcsv/{device_id}", get(get::export_performance_metrics_csv))
}

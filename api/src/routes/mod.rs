//! HTTP route entry point.
//!
//! Route groups:
//! - `/health` → Liveness probe
//! - `/data` → Pulling performance metrics from RNA and exporting them as CSV

use crate::routes::{data::data_routes, health::health_routes};
use axum::Router;

use crate::state::AppState;

pub mod data;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// # Route Structure:
/// - `/health` → Health check endpoint.
/// - `/data/pullperformancemetrics` → Runs one pull cycle.
/// - `/data/exportcsv/{device_id}` → CSV export for one device.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .nest("/data", data_routes())
        .with_state(app_state)
}

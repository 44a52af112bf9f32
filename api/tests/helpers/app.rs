use std::time::Duration;

use api::{routes::routes, state::AppState};
use axum::Router;
use db::test_utils::setup_test_db;
use services::{pull_service::PullService, rna_client::RnaClient};

/// Router over a fresh in-memory database whose pulls go to `upstream_url`.
pub async fn make_test_app(upstream_url: &str) -> (Router, AppState) {
    let db = setup_test_db().await;
    let client = RnaClient::new(upstream_url, false, Duration::from_secs(5))
        .expect("build RNA client");
    let app_state = AppState::new(db, PullService::new(client));

    (routes(app_state.clone()), app_state)
}

use axum::{
    Router,
    body::Body as AxumBody,
    http::{Request, StatusCode, header},
    response::Response,
};
use db::models::performance_metrics_data::Model as MetricModel;
use db::models::performance_metrics_index::Model as IndexModel;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::helpers::{StubResponse, make_test_app, spawn_upstream};

// ---------- test helpers ----------

fn get(uri: &str) -> Request<AxumBody> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(AxumBody::empty())
        .unwrap()
}

async fn call(app: &Router, uri: &str) -> Response {
    app.clone().oneshot(get(uri)).await.unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
}

fn single_latency_payload() -> Value {
    json!({ "result": { "devices": [
        { "id": "d1", "name": "DevA", "objects": [
            { "id": "o1", "name": "ObjA", "indicators": [ { "name": "latency", "value": 10.2 } ] }
        ] }
    ] } })
}

// ---------- TESTS ----------

#[tokio::test]
async fn pull_returns_message_and_index() {
    let url = spawn_upstream(StubResponse::json(single_latency_payload())).await;
    let (app, _) = make_test_app(&url).await;

    let resp = call(&app, "/data/pullperformancemetrics").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["message"], "Performance metrics updated successfully");
    assert_eq!(json["index"], 1);

    let resp = call(&app, "/data/pullperformancemetrics").await;
    assert_eq!(body_json(resp).await["index"], 2);
}

#[tokio::test]
async fn pull_with_failing_upstream_is_500_and_consumes_index() {
    let url = spawn_upstream(StubResponse::status(502)).await;
    let (app, app_state) = make_test_app(&url).await;

    let resp = call(&app, "/data/pullperformancemetrics").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        json!({ "error": "Failed to fetch performance metrics" })
    );

    let latest = IndexModel::latest(app_state.db()).await.unwrap().unwrap();
    assert_eq!(latest.index_no, 1);
}

#[tokio::test]
async fn pull_with_malformed_payload_is_500_with_detail() {
    let url = spawn_upstream(StubResponse::json(
        json!({ "result": { "devices": [ { "name": "no id" } ] } }),
    ))
    .await;
    let (app, app_state) = make_test_app(&url).await;

    let resp = call(&app, "/data/pullperformancemetrics").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(resp).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("Malformed metrics payload"), "got {error}");

    assert!(MetricModel::find_by_index(app_state.db(), 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn export_for_unknown_device_is_404() {
    let (app, _) = make_test_app("").await;

    let resp = call(&app, "/data/exportcsv/ghost").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({ "error": "No records found for the given device_id" })
    );
}

#[tokio::test]
async fn pull_then_export_round_trip() {
    let url = spawn_upstream(StubResponse::json(single_latency_payload())).await;
    let (app, app_state) = make_test_app(&url).await;

    let resp = call(&app, "/data/pullperformancemetrics").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let index = body_json(resp).await["index"].as_i64().unwrap() as i32;

    let rows = MetricModel::find_by_index(app_state.db(), index).await.unwrap();
    assert_eq!(rows.len(), 1);
    let stored = &rows[0];
    assert_eq!(
        (stored.device_id.as_str(), stored.object_id.as_str()),
        ("d1", "o1")
    );
    assert_eq!(stored.latency, Some(10.2));
    assert_eq!(stored.loss_percentage, None);
    assert_eq!(stored.jitter, None);

    let resp = call(&app, "/data/exportcsv/d1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=performance_metrics_d1.csv"
    );

    let csv = body_string(resp).await;
    let lines: Vec<&str> = csv.trim_end().split("\r\n").collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "Index,Device ID,Device Name,Object ID,Object Name,Loss Percentage,Jitter,Latency,Timestamp"
    );
    assert_eq!(
        lines[1],
        format!("{index},d1,DevA,o1,ObjA,,,10.2,{}", stored.timestamp)
    );
}

#[tokio::test]
async fn export_only_includes_requested_device() {
    let url = spawn_upstream(StubResponse::json(
        json!({ "result": { "devices": [
            { "id": "d1", "name": "DevA", "objects": [ { "id": "o1", "name": "ObjA", "indicators": [] } ] },
            { "id": "d2", "name": "DevB", "objects": [ { "id": "o2", "name": "ObjB", "indicators": [] } ] }
        ] } }),
    ))
    .await;
    let (app, _) = make_test_app(&url).await;

    call(&app, "/data/pullperformancemetrics").await;
    call(&app, "/data/pullperformancemetrics").await;

    let csv = body_string(call(&app, "/data/exportcsv/d2").await).await;
    let rows: Vec<&str> = csv.trim_end().split("\r\n").skip(1).collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("2,d2,DevB,o2,ObjB,"));
    assert!(rows[1].starts_with("1,d2,DevB,o2,ObjB,"));
}

#[tokio::test]
async fn pull_ignores_unrecognised_indicators() {
    let url = spawn_upstream(StubResponse::json(json!({ "result": { "devices": [
        { "id": "d1", "name": "DevA", "objects": [
            { "id": "o1", "name": "ObjA", "indicators": [
                { "name": "status", "value": "up" },
                { "value": 3.0 },
                { "name": "latency", "value": 10.2 }
            ] }
        ] }
    ] } })))
    .await;
    let (app, app_state) = make_test_app(&url).await;

    let resp = call(&app, "/data/pullperformancemetrics").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rows = MetricModel::find_by_index(app_state.db(), 1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].latency, Some(10.2));
}

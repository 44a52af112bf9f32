use std::time::Duration;

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

/// What the stub upstream answers on `GET /metrics`.
#[derive(Clone, Debug)]
pub enum StubResponse {
    Json(Value),
    Status(u16),
    Text(String),
    Delayed(Duration),
}

impl StubResponse {
    pub fn json(body: Value) -> Self {
        StubResponse::Json(body)
    }

    pub fn status(code: u16) -> Self {
        StubResponse::Status(code)
    }

    pub fn text(body: &str) -> Self {
        StubResponse::Text(body.to_owned())
    }

    pub fn delayed(by: Duration) -> Self {
        StubResponse::Delayed(by)
    }

    async fn render(self) -> Response {
        match self {
            StubResponse::Json(body) => Json(body).into_response(),
            StubResponse::Status(code) => StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response(),
            StubResponse::Text(body) => ([(header::CONTENT_TYPE, "text/html")], body).into_response(),
            StubResponse::Delayed(by) => {
                tokio::time::sleep(by).await;
                Json(json!({ "result": { "devices": [] } })).into_response()
            }
        }
    }
}

/// Serves `response` on an ephemeral local port and returns the metrics URL.
pub async fn spawn_upstream(response: StubResponse) -> String {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let response = response.clone();
            async move { response.render().await }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub upstream address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}/metrics")
}

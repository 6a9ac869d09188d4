use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;

type HandlerError = (StatusCode, String);

pub async fn start(listener: TcpListener) -> anyhow::Result<()> {
    axum::serve(listener, router()).await?;
    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/plus", get(plus))
        .route("/items/{id}", post(create_item).delete(delete_item))
        .route("/slow", get(slow))
        .fallback(|| async { (StatusCode::NOT_FOUND, "not found") })
}

/// The whole query string is one URL-encoded JSON document.
fn query_json(query: Option<String>) -> Result<Value, HandlerError> {
    let raw = query.unwrap_or_default();
    let json = percent_encoding::percent_decode_str(&raw)
        .decode_utf8_lossy()
        .into_owned();
    serde_json::from_str(&json).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

async fn plus(RawQuery(query): RawQuery) -> Result<Json<Value>, HandlerError> {
    let input = query_json(query)?;
    let operand = |key: &str| {
        input[key]
            .as_i64()
            .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("missing operand {key}")))
    };
    let sum = operand("a")? + operand("b")?;
    Ok(Json(json!({ "sum": sum })))
}

async fn create_item(Path(id): Path<String>, Json(item): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "id": id, "item": item })))
}

async fn delete_item(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({ "done": true }))
}

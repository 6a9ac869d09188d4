use std::time::Duration;

use httproc::{AbortSignal, CallContext, Client, ClientBuilder, ClientError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub struct CaseResult {
    pub name: &'static str,
    pub error: Option<String>,
}

pub async fn run_cases(endpoint: &str) -> Vec<CaseResult> {
    let client = match ClientBuilder::new(endpoint)
        .api("plus", "GET /plus")
        .api("missing", "GET /missing")
        .api("createItem", "POST /items/{id}")
        .api("deleteItem", "DELETE /items/{id}")
        .api("slow", "GET /slow")
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return vec![CaseResult {
                name: "build client",
                error: Some(e.to_string()),
            }];
        }
    };

    vec![
        record("GET plus with JSON query", plus(&client).await),
        record("typed plus", typed_plus(&client).await),
        record("404 becomes response error", missing(&client).await),
        record("POST fills path and body", create_item(&client).await),
        record("DELETE with empty body", delete_item(&client).await),
        record("abort before response", abort_slow(&client).await),
    ]
}

fn record(name: &'static str, result: anyhow::Result<()>) -> CaseResult {
    CaseResult {
        name,
        error: result.err().map(|e| e.to_string()),
    }
}

async fn plus(client: &Client) -> anyhow::Result<()> {
    let output = client
        .call("plus", json!({ "a": 1, "b": 2 }), CallContext::new())
        .await?;
    if output != json!({ "sum": 3 }) {
        anyhow::bail!("expected {{\"sum\":3}}, got {output}");
    }
    Ok(())
}

async fn typed_plus(client: &Client) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct Operands {
        a: i64,
        b: i64,
    }
    #[derive(Deserialize)]
    struct Sum {
        sum: i64,
    }

    let out: Sum = client
        .call_as("plus", &Operands { a: 40, b: 2 }, CallContext::new())
        .await?;
    if out.sum != 42 {
        anyhow::bail!("expected 42, got {}", out.sum);
    }
    Ok(())
}

async fn missing(client: &Client) -> anyhow::Result<()> {
    match client.call("missing", json!({}), CallContext::new()).await {
        Err(ClientError::HttpResponse { code: 404, body }) if body == "not found" => Ok(()),
        other => anyhow::bail!("expected 404 \"not found\", got {other:?}"),
    }
}

async fn create_item(client: &Client) -> anyhow::Result<()> {
    let output = client
        .call("createItem", json!({ "id": 7, "name": "seven" }), CallContext::new())
        .await?;
    let expected = json!({ "id": "7", "item": { "id": 7, "name": "seven" } });
    if output != expected {
        anyhow::bail!("expected {expected}, got {output}");
    }
    Ok(())
}

async fn delete_item(client: &Client) -> anyhow::Result<()> {
    let output = client
        .call("deleteItem", json!({ "id": 7 }), CallContext::new())
        .await?;
    if !output.is_null() {
        anyhow::bail!("expected null, got {output}");
    }
    Ok(())
}

async fn abort_slow(client: &Client) -> anyhow::Result<()> {
    let ctx = CallContext::new().with_abort(AbortSignal::after(Duration::from_millis(50)));
    match client.call("slow", json!({}), ctx).await {
        Err(e) if e.is_aborted() => Ok(()),
        other => anyhow::bail!("expected abort, got {other:?}"),
    }
}

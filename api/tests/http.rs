//! HTTP front end against an in-memory pipeline.

mod common;

use std::sync::Arc;

use api::{AppState, router};
use common::{ANSWER, ScriptedModel, TicketStore, agent, agent_with};
use serde_json::{Value, json};
use ticket_agent::TicketSearchAgent;

async fn spawn_app(agent: Arc<TicketSearchAgent>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(AppState::new(agent)));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_running() {
    let base = spawn_app(agent()).await;
    let res = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"status": "ok", "message": "ADK Zendesk Search API is running"})
    );
}

#[tokio::test]
async fn agent_info_describes_the_agent() {
    let base = spawn_app(agent()).await;
    let body: Value = reqwest::get(format!("{base}/agent-info"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["agent_name"], "zendesk_search_agent");
    assert_eq!(body["model"], "stub-model");
    assert_eq!(body["collection"], "zendesk");
    assert!(body["description"].as_str().is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn query_returns_summaries_and_answer() {
    let agent = agent_with(
        Arc::new(TicketStore::default()),
        ScriptedModel {
            panic_on_answer: false,
        },
    );
    let base = spawn_app(agent.clone()).await;

    let res = reqwest::get(format!("{base}/query?search_term=refund%20delays"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["query"], "refund delays");
    assert_eq!(body["answer"], ANSWER);
    let summaries = body["ticket_summaries"].as_array().unwrap();
    let ids: Vec<&Value> = summaries.iter().map(|s| &s["ticket_id"]).collect();
    assert_eq!(ids, [&json!("T1"), &json!("T2")]);
    assert_eq!(
        summaries[0]["metadata"],
        json!({"ticket_id": "T1", "subject": "Refund"})
    );
    assert!(body.get("outcome").is_none());

    // Sessions are released once the response is built.
    assert!(agent.sessions().is_empty().await);
}

#[tokio::test]
async fn query_uses_default_limit() {
    let store = Arc::new(TicketStore::default());
    let agent = agent_with(
        store.clone(),
        ScriptedModel {
            panic_on_answer: false,
        },
    );
    let base = spawn_app(agent).await;
    reqwest::get(format!("{base}/query?search_term=x"))
        .await
        .unwrap();
    assert_eq!(*store.top_k_seen.lock().unwrap(), [5]);
}

#[tokio::test]
async fn search_failure_is_reported_in_answer() {
    let agent = agent_with(
        Arc::new(TicketStore {
            search_error: Some("connection refused".into()),
            ..Default::default()
        }),
        ScriptedModel {
            panic_on_answer: false,
        },
    );
    let base = spawn_app(agent).await;

    let res = reqwest::get(format!("{base}/query?search_term=refund"))
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ticket_summaries"], json!([]));
    assert_eq!(
        body["answer"],
        "An error occurred during search: RAG error: qdrant error: connection refused"
    );
}

#[tokio::test]
async fn missing_search_term_is_bad_request() {
    let base = spawn_app(agent()).await;
    let res = reqwest::get(format!("{base}/query")).await.unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("search_term")));
}

#[tokio::test]
async fn crashed_pipeline_is_internal_error() {
    let agent = agent_with(
        Arc::new(TicketStore::default()),
        ScriptedModel {
            panic_on_answer: true,
        },
    );
    let base = spawn_app(agent).await;

    let res = reqwest::get(format!("{base}/query?search_term=refund"))
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("panicked")));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let base = spawn_app(agent()).await;
    let res = reqwest::Client::new()
        .get(format!("{base}/"))
        .header("Origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

//! Integration tests for the HTTP API.
//!
//! Each test starts the real server on an ephemeral port against its own
//! database and talks to it over HTTP.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tasklist::config::ServerConfig;
use tasklist::db::Database;
use tasklist::http::{ErrorBody, start_server};
use tasklist::types::{Task, TaskStatus};
use tokio::sync::oneshot;

const ALLOWED_ORIGIN: &str = "http://localhost:5173";

struct TestServer {
    base: String,
    client: Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start() -> Self {
        let db = Database::open_in_memory().expect("Failed to create in-memory database");
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        };
        let (shutdown, addr): (_, SocketAddr) =
            start_server(db, &config).await.expect("Failed to start server");

        Self {
            base: format!("http://{}", addr),
            client: Client::new(),
            _shutdown: shutdown,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn create(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/tasks"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn list(&self) -> Vec<Task> {
        let response = self.client.get(self.url("/tasks")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }
}

async fn detail(response: reqwest::Response) -> String {
    response.json::<ErrorBody>().await.unwrap().detail
}

#[tokio::test]
async fn list_starts_empty() {
    let server = TestServer::start().await;
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn create_returns_201_with_task() {
    let server = TestServer::start().await;

    let response = server
        .create(json!({"task_name": "Buy milk", "description": "2%"}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["task_name"], "Buy milk");
    assert_eq!(body["description"], "2%");
    assert_eq!(body["status"], "pending");
    assert!(body["date_added"].is_string());
}

#[tokio::test]
async fn create_without_description_serializes_null() {
    let server = TestServer::start().await;

    let response = server
        .create(json!({"task_name": "Stretch", "status": "in-progress"}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["description"], Value::Null);
    assert_eq!(body["status"], "in-progress");
}

#[tokio::test]
async fn create_validation_failures_are_422() {
    let server = TestServer::start().await;

    for body in [
        json!({"task_name": ""}),
        json!({"task_name": "x".repeat(101)}),
        json!({"task_name": "ok", "description": "d".repeat(256)}),
        json!({"task_name": "ok", "status": "archived"}),
        json!({"description": "no name"}),
        json!({"task_name": 42}),
    ] {
        let response = server.create(body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "payload {}",
            body
        );
        assert!(!detail(response).await.is_empty());
    }

    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_422() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(server.url("/tasks"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!detail(response).await.is_empty());
}

#[tokio::test]
async fn list_returns_tasks_in_id_order() {
    let server = TestServer::start().await;
    for name in ["one", "two", "three"] {
        server.create(json!({"task_name": name})).await;
    }

    let tasks = server.list().await;

    let names: Vec<&str> = tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["one", "two", "three"]);
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn put_merges_partial_update() {
    let server = TestServer::start().await;
    let created: Task = server
        .create(json!({"task_name": "Buy milk", "description": "2%"}))
        .await
        .json()
        .await
        .unwrap();

    let response = server
        .client
        .put(server.url(&format!("/tasks/{}", created.id)))
        .json(&json!({"status": "done"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Task = response.json().await.unwrap();
    assert_eq!(updated.status, TaskStatus::Done);
    assert_eq!(updated.task_name, "Buy milk");
    assert_eq!(updated.description.as_deref(), Some("2%"));
    assert_eq!(updated.date_added, created.date_added);
    assert_eq!(server.list().await, vec![updated]);
}

#[tokio::test]
async fn put_unknown_id_is_404() {
    let server = TestServer::start().await;

    let response = server
        .client
        .put(server.url("/tasks/99"))
        .json(&json!({"status": "done"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(response).await, "Task not found: 99");
    assert!(server.list().await.is_empty());
}

#[tokio::test]
async fn put_invalid_field_is_422() {
    let server = TestServer::start().await;
    server.create(json!({"task_name": "Stable"})).await;

    let response = server
        .client
        .put(server.url("/tasks/1"))
        .json(&json!({"task_name": ""}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(server.list().await[0].task_name, "Stable");
}

#[tokio::test]
async fn non_integer_id_is_422() {
    let server = TestServer::start().await;

    let response = server
        .client
        .delete(server.url("/tasks/abc"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let server = TestServer::start().await;
    server.create(json!({"task_name": "Temporary"})).await;

    let response = server
        .client
        .delete(server.url("/tasks/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());
    assert!(server.list().await.is_empty());

    let response = server
        .client
        .delete(server.url("/tasks/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_version() {
    let server = TestServer::start().await;

    let body: Value = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

mod cors_tests {
    use super::*;

    #[tokio::test]
    async fn preflight_from_allowed_origin_is_accepted() {
        let server = TestServer::start().await;

        let response = server
            .client
            .request(reqwest::Method::OPTIONS, server.url("/tasks"))
            .header("origin", ALLOWED_ORIGIN)
            .header("access-control-request-method", "PUT")
            .header("access-control-request-headers", "content-type,x-custom")
            .send()
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], ALLOWED_ORIGIN);
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-methods"], "PUT");
        assert_eq!(
            headers["access-control-allow-headers"],
            "content-type,x-custom"
        );
    }

    #[tokio::test]
    async fn simple_request_from_allowed_origin_gets_headers() {
        let server = TestServer::start().await;

        let response = server
            .client
            .get(server.url("/tasks"))
            .header("origin", ALLOWED_ORIGIN)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            ALLOWED_ORIGIN
        );
    }

    #[tokio::test]
    async fn other_origins_get_no_cors_headers() {
        let server = TestServer::start().await;

        let response = server
            .client
            .get(server.url("/tasks"))
            .header("origin", "https://evil.example")
            .send()
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none()
        );
    }
}

//! axum server exposing the CRUD operations as a JSON API.

use crate::config::ServerConfig;
use crate::crud;
use crate::db::Database;
use crate::error::{TaskError, TaskResult};
use crate::types::{Task, TaskInput};
use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, put},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared across handlers. Holds the database location only; each
/// request opens its own connection.
#[derive(Clone)]
pub struct ApiState {
    db: Database,
}

impl ApiState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Run blocking storage work off the async executor.
async fn run_blocking<F, T>(f: F) -> TaskResult<T>
where
    F: FnOnce() -> TaskResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(TaskError::internal)?
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_tasks(State(state): State<ApiState>) -> TaskResult<Json<Vec<Task>>> {
    let db = state.db().clone();
    let tasks = run_blocking(move || crud::list_tasks(&db)).await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<ApiState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> TaskResult<(StatusCode, Json<Task>)> {
    let Json(input) = payload?;
    let db = state.db().clone();
    let task = run_blocking(move || crud::create_task(&db, input)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<ApiState>,
    task_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> TaskResult<Json<Task>> {
    let Path(task_id) = task_id?;
    let Json(input) = payload?;
    let db = state.db().clone();
    let task = run_blocking(move || crud::update_task(&db, task_id, input)).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<ApiState>,
    task_id: Result<Path<i64>, PathRejection>,
) -> TaskResult<StatusCode> {
    let Path(task_id) = task_id?;
    let db = state.db().clone();
    run_blocking(move || crud::delete_task(&db, task_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// CORS policy: the configured origins, any method and header, credentials
/// allowed. Methods and headers are mirrored because a wildcard cannot be
/// combined with credentials.
fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    if allowed_origins.iter().any(|origin| origin == "*") {
        anyhow::bail!("wildcard CORS origin cannot be combined with credentials; list origins explicitly");
    }
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Build the router with all routes.
pub fn build_router(state: ApiState, config: &ServerConfig) -> anyhow::Result<Router> {
    let cors = cors_layer(&config.allowed_origins)?;

    Ok(Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{task_id}", put(update_task).delete(delete_task))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

async fn bind(db: Database, config: &ServerConfig) -> anyhow::Result<(TcpListener, Router)> {
    let app = build_router(ApiState::new(db), config)?;
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Task API listening on http://{}", listener.local_addr()?);
    Ok((listener, app))
}

/// Serve the API until `shutdown` resolves.
pub async fn serve<F>(db: Database, config: &ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, app) = bind(db, config).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Task API stopped");
    Ok(())
}

/// Start the HTTP server in the background.
///
/// Returns a oneshot sender that can be used to signal shutdown,
/// and the actual address the server is bound to (useful with port 0).
pub async fn start_server(
    db: Database,
    config: &ServerConfig,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr)> {
    let (listener, app) = bind(db, config).await?;
    let bound_addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task API shutting down");
            })
            .await
        {
            tracing::error!("Task API server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}

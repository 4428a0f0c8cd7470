//! JSON handlers for `/api/*`.
//!
//! Handlers only translate: parse the request, call `TaskService` on the
//! blocking pool, shape the envelope. Every failure leaves as `{ success: false, message }`.

use crate::dto::{
    ClearedResponse, CreateTaskRequest, HealthResponse, ListQuery, MessageResponse,
    StatsResponse, TaskListResponse, TaskResponse, UpdateTaskRequest,
};
use crate::error::TaskError;
use crate::service::TaskService;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, warn};

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub service: TaskService,
}

pub type SharedState = Arc<AppState>;

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    /// Carries the client-facing message only; details go to the log.
    Internal(&'static str),
}

impl ApiError {
    /// Map a service failure. `failure` is what the client sees on a 500.
    fn from_task(err: TaskError, failure: &'static str) -> Self {
        match err {
            TaskError::Validation(msg) => ApiError::BadRequest(msg),
            TaskError::NotFound(_) => ApiError::NotFound,
            TaskError::Storage(e) => {
                error!(error = %e, "{failure}");
                ApiError::Internal(failure)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection, "rejected query string");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };
        (status, Json(MessageResponse::failed(message))).into_response()
    }
}

// ── Handlers ───────────────────────────────────────────────────

/// Run a service call on the blocking pool. The service does file I/O
/// under a std mutex, which must stay off the async workers.
async fn run_blocking<T, F>(state: SharedState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&TaskService) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.service))
        .await
        .map_err(|e| {
            error!(error = %e, "service call aborted");
            ApiError::Internal("Internal server error")
        })
}

// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
    })
}

// GET /api/tasks[?filter=&search=]
pub async fn list_tasks(
    State(state): State<SharedState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let Query(query) = query?;

    let tasks = run_blocking(state, move |service| {
        if query.is_empty() {
            service.list_tasks()
        } else {
            service.query_tasks(query.filter.unwrap_or_default(), query.search.as_deref())
        }
    })
    .await?;

    Ok(Json(TaskListResponse::ok(tasks)))
}

// GET /api/tasks/stats
pub async fn task_stats(
    State(state): State<SharedState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = run_blocking(state, |service| service.stats()).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

// POST /api/tasks
pub async fn create_task(
    State(state): State<SharedState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let Json(payload) = payload?;

    let task = run_blocking(state, move |service| service.add_task(payload.into()))
        .await?
        .map_err(|e| ApiError::from_task(e, "Failed to add task"))?;

    Ok((StatusCode::CREATED, Json(TaskResponse::ok(task))))
}

// PATCH /api/tasks/:id/toggle
pub async fn toggle_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = run_blocking(state, move |service| service.toggle_task(&id))
        .await?
        .map_err(|e| ApiError::from_task(e, "Failed to update task"))?;

    Ok(Json(TaskResponse::ok(task)))
}

// PUT /api/tasks/:id
pub async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let Json(payload) = payload?;

    let task = run_blocking(state, move |service| service.update_task(&id, payload.into()))
        .await?
        .map_err(|e| ApiError::from_task(e, "Failed to update task"))?;

    Ok(Json(TaskResponse::ok(task)))
}

// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    run_blocking(state, move |service| service.delete_task(&id))
        .await?
        .map_err(|e| ApiError::from_task(e, "Failed to delete task"))?;

    Ok(Json(MessageResponse::ok("Task deleted successfully")))
}

// DELETE /api/tasks/completed/clear
pub async fn clear_completed(
    State(state): State<SharedState>,
) -> Result<Json<ClearedResponse>, ApiError> {
    let count = run_blocking(state, |service| service.clear_completed())
        .await?
        .map_err(|e| ApiError::from_task(e, "Failed to clear tasks"))?;

    Ok(Json(ClearedResponse::ok(count)))
}

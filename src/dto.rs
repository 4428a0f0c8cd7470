use crate::model::{lenient_string, Task};
use crate::tasks::{Filter, NewTask, TaskChanges, TaskStats};
use serde::{Deserialize, Deserializer, Serialize};

// ── Requests ───────────────────────────────────────────────────

/// Body of `POST /api/tasks`. `title` is optional here so a missing title
/// gets the same 400 as a blank one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        NewTask {
            title: req.title.unwrap_or_default(),
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

/// Body of `PUT /api/tasks/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub priority: Option<String>,
    /// Absent key → `None`; `"dueDate": null` → `Some(None)`.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: req.title,
            priority: req.priority,
            due_date: req.due_date,
        }
    }
}

/// Only called when the key is in the body, so any value (null included) is `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Some)
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.search.is_none()
    }
}

// ── Responses ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
}

impl TaskListResponse {
    pub fn ok(tasks: Vec<Task>) -> Self {
        TaskListResponse { success: true, tasks }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
}

impl TaskResponse {
    pub fn ok(task: Task) -> Self {
        TaskResponse { success: true, task }
    }
}

/// Plain acknowledgement, also used for every failure body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        MessageResponse {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        MessageResponse {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearedResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

impl ClearedResponse {
    pub fn ok(count: usize) -> Self {
        ClearedResponse {
            success: true,
            message: format!("Cleared {count} completed tasks"),
            count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: TaskStats,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
}

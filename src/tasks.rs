//! The task collection and every rule that mutates it.
//!
//! `TaskList` is pure and in-memory: it never touches disk and takes the
//! current time as an argument. `TaskService` wraps it with load/save.

use crate::error::TaskError;
use crate::model::{Priority, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Inputs ─────────────────────────────────────────────────────

/// Fields for a task about to be added. Raw client values; normalised by `add`.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub priority: Option<String>,
    /// An empty string is stored as no date.
    pub due_date: Option<String>,
}

/// Partial update. `None` leaves a field alone.
///
/// `due_date` is doubly optional: `Some(None)` clears the date, `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub priority: Option<String>,
    /// `Some(None)` and `Some(Some(""))` both clear the date: an empty
    /// string is never stored, so clients see null rather than `""`.
    pub due_date: Option<Option<String>>,
}

/// Which slice of the collection a reader wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    fn keeps(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Completed share in whole percent, 0 for an empty list.
    pub progress: u8,
}

// ── The collection ─────────────────────────────────────────────

/// Ordered task collection, most recent first.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Create a task and put it at the front of the list.
    pub fn add(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<Task, TaskError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(TaskError::validation("Task title is required"));
        }

        let task = Task {
            id: self.fresh_id(),
            title: title.to_string(),
            completed: false,
            priority: Priority::from_input(new.priority).unwrap_or_default(),
            due_date: new.due_date.filter(|d| !d.is_empty()),
            created_at: now,
            completed_at: None,
            updated_at: None,
        };

        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Flip `completed`, stamping or clearing `completed_at` to match.
    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Result<Task, TaskError> {
        let task = self.find_mut(id)?;

        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);

        Ok(task.clone())
    }

    /// Overwrite the given fields. Blank titles and empty priorities count as absent.
    pub fn update(
        &mut self,
        id: &str,
        changes: TaskChanges,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskError> {
        let task = self.find_mut(id)?;

        if let Some(title) = changes.title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(priority) = Priority::from_input(changes.priority) {
            task.priority = priority;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date.filter(|d| !d.is_empty());
        }
        task.updated_at = Some(now);

        Ok(task.clone())
    }

    /// Remove one task, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Task, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::not_found(id))?;
        Ok(self.tasks.remove(index))
    }

    /// Drop every completed task. Returns how many went.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    /// Tasks passing `filter` whose title contains `search` (case-insensitive).
    /// Order is preserved.
    pub fn view(&self, filter: Filter, search: Option<&str>) -> Vec<Task> {
        let needle = search
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.tasks
            .iter()
            .filter(|t| filter.keeps(t))
            .filter(|t| match &needle {
                Some(needle) => t.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        let progress = if total == 0 {
            0
        } else {
            (completed as f64 * 100.0 / total as f64).round() as u8
        };

        TaskStats {
            total,
            completed,
            pending: total - completed,
            progress,
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskError::not_found(id))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.tasks.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

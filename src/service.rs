//! Business operations over the save file.
//!
//! Every call runs one load → mutate → save cycle under a single
//! process-wide lock, so concurrent requests never interleave their
//! cycles and lose each other's writes.

use crate::error::TaskError;
use crate::model::Task;
use crate::store::SaveFile;
use crate::tasks::{Filter, NewTask, TaskChanges, TaskList, TaskStats};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};
use tracing::info;

pub struct TaskService {
    save_file: SaveFile,
    lock: Mutex<()>,
}

impl TaskService {
    pub fn new(save_file: SaveFile) -> Self {
        TaskService {
            save_file,
            lock: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub(crate) fn save_file(&self) -> &SaveFile {
        &self.save_file
    }

    /// The whole collection, most recent first.
    pub fn list_tasks(&self) -> Vec<Task> {
        self.read(|list| list.into_tasks())
    }

    pub fn query_tasks(&self, filter: Filter, search: Option<&str>) -> Vec<Task> {
        self.read(|list| list.view(filter, search))
    }

    pub fn stats(&self) -> TaskStats {
        self.read(|list| list.stats())
    }

    pub fn add_task(&self, new: NewTask) -> Result<Task, TaskError> {
        let task = self.mutate(|list, now| list.add(new, now))?;
        info!(task_id = %task.id, priority = %task.priority, "task added");
        Ok(task)
    }

    pub fn toggle_task(&self, id: &str) -> Result<Task, TaskError> {
        let task = self.mutate(|list, now| list.toggle(id, now))?;
        info!(task_id = %task.id, completed = task.completed, "task toggled");
        Ok(task)
    }

    pub fn update_task(&self, id: &str, changes: TaskChanges) -> Result<Task, TaskError> {
        let task = self.mutate(|list, now| list.update(id, changes, now))?;
        info!(task_id = %task.id, "task updated");
        Ok(task)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), TaskError> {
        self.mutate(|list, _| list.delete(id))?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Remove every completed task. Returns the number removed (0 is fine).
    pub fn clear_completed(&self) -> Result<usize, TaskError> {
        let count = self.mutate(|list, _| Ok(list.clear_completed()))?;
        info!(count, "completed tasks cleared");
        Ok(count)
    }

    fn read<T>(&self, f: impl FnOnce(TaskList) -> T) -> T {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        f(TaskList::new(self.save_file.load()))
    }

    /// THE mutation codepath. Nothing is written unless `f` succeeds.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut TaskList, DateTime<Utc>) -> Result<T, TaskError>,
    ) -> Result<T, TaskError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut list = TaskList::new(self.save_file.load());
        let out = f(&mut list, Utc::now())?;
        self.save_file.save(list.tasks())?;
        Ok(out)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn temp_service() -> (TaskService, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sf = SaveFile::open(dir.path().join("tasks.json")).unwrap();
        (TaskService::new(sf), dir)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            ..NewTask::default()
        }
    }

    #[test]
    fn add_persists_to_disk() {
        let (svc, _dir) = temp_service();
        let task = svc.add_task(new_task("Buy milk")).unwrap();

        let reloaded = svc.save_file().load();
        assert_eq!(reloaded, vec![task]);
    }

    #[test]
    fn rejected_add_writes_nothing() {
        let (svc, _dir) = temp_service();
        let before = fs::read(svc.save_file().path()).unwrap();

        let err = svc.add_task(new_task("   ")).unwrap_err();
        assert!(matches!(err, TaskError::Validation(_)));
        assert_eq!(fs::read(svc.save_file().path()).unwrap(), before);
    }

    #[test]
    fn not_found_leaves_collection_unchanged() {
        let (svc, _dir) = temp_service();
        svc.add_task(new_task("Keep")).unwrap();
        let before = svc.list_tasks();

        assert!(matches!(svc.toggle_task("missing"), Err(TaskError::NotFound(_))));
        assert!(matches!(
            svc.update_task("missing", TaskChanges::default()),
            Err(TaskError::NotFound(_))
        ));
        assert!(matches!(svc.delete_task("missing"), Err(TaskError::NotFound(_))));
        assert_eq!(svc.list_tasks(), before);
    }

    #[test]
    fn toggle_update_delete_round_trip_through_disk() {
        let (svc, _dir) = temp_service();
        let id = svc.add_task(new_task("Draft")).unwrap().id;

        let toggled = svc.toggle_task(&id).unwrap();
        assert!(toggled.completed);
        assert!(toggled.completed_at.is_some());

        let updated = svc
            .update_task(
                &id,
                TaskChanges {
                    title: Some("Final".into()),
                    ..TaskChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert!(updated.completed);
        assert_eq!(svc.list_tasks(), vec![updated]);

        svc.delete_task(&id).unwrap();
        assert!(svc.list_tasks().is_empty());
    }

    #[test]
    fn clear_completed_counts_and_persists() {
        let (svc, _dir) = temp_service();
        let done = svc.add_task(new_task("Done")).unwrap();
        let pending = svc.add_task(new_task("Pending")).unwrap();
        svc.toggle_task(&done.id).unwrap();

        assert_eq!(svc.clear_completed().unwrap(), 1);
        assert_eq!(svc.list_tasks(), vec![pending]);
        assert_eq!(svc.clear_completed().unwrap(), 0);
    }

    #[test]
    fn storage_failure_surfaces_as_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("tasks.json");
        let svc = TaskService::new(SaveFile::open(&path).unwrap());
        fs::remove_dir_all(dir.path().join("sub")).unwrap();

        let err = svc.add_task(new_task("Lost")).unwrap_err();
        assert!(matches!(err, TaskError::Storage(_)));
    }

    #[test]
    fn concurrent_adds_are_all_kept() {
        let (svc, _dir) = temp_service();
        let svc = Arc::new(svc);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = Arc::clone(&svc);
                std::thread::spawn(move || {
                    for j in 0..5 {
                        svc.add_task(new_task(&format!("t{i}-{j}"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(svc.list_tasks().len(), 40);
        assert_eq!(svc.stats().total, 40);
    }
}

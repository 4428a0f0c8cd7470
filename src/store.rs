//! Task list ↔ JSON flat file.
//!
//! The file holds the whole collection as one JSON array. Every save
//! rewrites it completely; there is no partial update.

use crate::error::StoreError;
use crate::model::Task;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
#[cfg(feature = "profile")]
use std::time::Instant;
use tracing::{debug, warn};

/// Handle to the save file. Cheap to clone; holds only the path.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    /// Open (or create) the save file at the given path.
    /// Creates the parent directory and an empty list if nothing is there yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let save_file = SaveFile { path };
        if !save_file.path.exists() {
            save_file.save(&[])?;
            debug!(path = %save_file.path.display(), "created empty save file");
        }

        Ok(save_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full collection. A missing or unreadable file reads as empty.
    pub fn load(&self) -> Vec<Task> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "save file unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "save file corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the persisted collection with `tasks`.
    ///
    /// Writes a sibling temp file and renames it over the target, so a
    /// crash mid-write leaves the previous snapshot intact.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        #[cfg(feature = "profile")]
        let start = Instant::now();

        let bytes = serde_json::to_vec_pretty(tasks)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, &bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        #[cfg(feature = "profile")]
        debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            tasks = tasks.len(),
            bytes = bytes.len(),
            "save file written"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tasks.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

// ── Tests ──────────────────────────────────────────────────────

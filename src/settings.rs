use serde::Deserialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const SETTINGS_FILENAME: &str = "settings.json";
/// Points at a settings file other than `./settings.json`.
pub const SETTINGS_ENV: &str = "TASKLIST_SETTINGS";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    pub data_file: PathBuf,
    pub public_dir: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tcp_socket_binding: "0.0.0.0".to_string(),
            tcp_socket_port: 3000,
            data_file: PathBuf::from("data/tasks.json"),
            public_dir: PathBuf::from("public"),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("PORT must be a port number, got {0:?}")]
    Port(String),
}

impl Settings {
    /// Settings file (if any) plus environment overrides.
    pub fn load() -> Result<Settings, SettingsError> {
        let path = std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));

        Settings::from_file(&path)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Settings, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PORT`, `TASKS_FILE` and `PUBLIC_DIR` as looked up by `var`.
    pub fn with_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings, SettingsError> {
        if let Some(port) = var("PORT") {
            self.tcp_socket_port = port.trim().parse().map_err(|_| SettingsError::Port(port))?;
        }
        if let Some(file) = var("TASKS_FILE") {
            self.data_file = PathBuf::from(file);
        }
        if let Some(dir) = var("PUBLIC_DIR") {
            self.public_dir = PathBuf::from(dir);
        }
        Ok(self)
    }
}

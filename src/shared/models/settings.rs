use std::{env, fs, io, path::{Path, PathBuf}, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

pub const SETTINGS_FILENAME: &str = "settings.json";
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Cannot parse JSON content from file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Credentials and endpoint for the remote workspace database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub token: String,
    pub database_id: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
}

impl RemoteSettings {
    /// Usable when the token is non-blank and the database id is a UUID.
    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty() && Uuid::parse_str(self.database_id.trim()).is_ok()
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default = "default_binding")]
    tcp_socket_binding: String,
    #[serde(default = "default_port")]
    tcp_socket_port: u16,
    #[serde(default = "default_tasks_file")]
    tasks_file: PathBuf,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            tcp_socket_binding: default_binding(),
            tcp_socket_port: default_port(),
            tasks_file: default_tasks_file(),
        }
    }
}

fn default_binding() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("tasks.json")
}

/// Process configuration, loaded once at startup and never re-read.
#[derive(Debug, Clone)]
pub struct Settings {
    pub tcp_socket_binding: String,
    pub tcp_socket_port: u16,
    pub tasks_file: PathBuf,
    /// Present when both remote variables are set, valid or not.
    pub remote: Option<RemoteSettings>,
}

impl Settings {
    pub fn load() -> Result<Settings, SettingsError> {
        Self::load_from(Path::new(SETTINGS_FILENAME), |name| env::var(name).ok())
    }

    /// Reads `path` if it exists, then applies environment overrides via `lookup`.
    pub fn load_from(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings, SettingsError> {
        let file = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
            serde_json::from_str(&content)
                .map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })?
        } else {
            SettingsFile::default()
        };

        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let tcp_socket_port = match lookup("TASK_TRACKER_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| SettingsError::InvalidEnv { name: "TASK_TRACKER_PORT", value })?,
            None => file.tcp_socket_port,
        };

        let remote = match (lookup("NOTION_TOKEN"), lookup("NOTION_DATABASE_ID")) {
            (Some(token), Some(database_id)) => Some(RemoteSettings {
                token,
                database_id,
                api_base_url: lookup("NOTION_API_URL")
                    .unwrap_or_else(|| DEFAULT_NOTION_API_URL.to_string()),
                request_timeout: Duration::from_secs(10),
            }),
            _ => None,
        };

        Ok(Settings {
            tcp_socket_binding: file.tcp_socket_binding,
            tcp_socket_port,
            tasks_file: lookup("TASKS_FILE").map(PathBuf::from).unwrap_or(file.tasks_file),
            remote,
        })
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.tcp_socket_binding, self.tcp_socket_port)
    }
}

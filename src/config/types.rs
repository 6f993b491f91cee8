//! Configuration types.

use crate::reconciler::ReconcilerOptions;
use crate::remote::DEFAULT_REMOTE_URL;
use crate::types::DEFAULT_OWNER_ID;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Local task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("todo-sync/tasks.db")
}

/// Remote task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// When false the remote is never contacted.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_remote_url")]
    pub url: String,

    /// Request timeout. No timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_remote_url(),
            timeout_secs: None,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_true() -> bool {
    true
}

/// Sync policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Import from the remote every time the store is found empty.
    #[serde(default = "default_true")]
    pub reimport_when_empty: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            reimport_when_empty: true,
        }
    }
}

/// Defaults for locally created tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default = "default_owner_id")]
    pub default_owner_id: i64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_owner_id: default_owner_id(),
        }
    }
}

fn default_owner_id() -> i64 {
    DEFAULT_OWNER_ID
}

impl Config {
    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.store.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn reconciler_options(&self) -> ReconcilerOptions {
        ReconcilerOptions {
            default_owner_id: self.tasks.default_owner_id,
            reimport_when_empty: self.sync.reimport_when_empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.remote.url, DEFAULT_REMOTE_URL);
        assert!(config.remote.enabled);
        assert!(config.remote.timeout().is_none());
        assert_eq!(config.tasks.default_owner_id, 1);
    }

    #[test]
    fn test_partial_section() {
        let yaml = r#"
remote:
  timeout_secs: 15
sync:
  reimport_when_empty: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.remote.url, DEFAULT_REMOTE_URL);
        assert_eq!(config.remote.timeout(), Some(Duration::from_secs(15)));

        let options = config.reconciler_options();
        assert!(!options.reimport_when_empty);
        assert_eq!(options.default_owner_id, 1);
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.store.db_path = temp.path().join("nested/dir/tasks.db");
        config.ensure_db_dir().unwrap();
        assert!(temp.path().join("nested/dir").is_dir());
    }
}

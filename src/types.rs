//! Core types for the to-do task store.

use serde::{Deserialize, Serialize};

/// Owner id assigned to locally created tasks.
pub const DEFAULT_OWNER_ID: i64 = 1;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    pub owner_id: i64,
    /// Milliseconds since the Unix epoch. Set once at creation.
    pub created_at: i64,
}

impl TaskRecord {
    /// Build a record with `completed = false`.
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        owner_id: i64,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
            owner_id,
            created_at,
        }
    }
}

/// Whether the store has ever adopted the remote task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    NeverSynced,
    Synced {
        /// When the last import or merge finished (ms).
        at: i64,
        /// Number of records the last import or merge brought in.
        imported: usize,
    },
}

impl SyncState {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncState::Synced { .. })
    }
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState::NeverSynced
    }
}

/// Where a successful load got its records from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// Store was non-empty; remote was not consulted.
    Local,
    /// Store was empty and has been replaced with the remote list.
    RemoteImport,
}

/// Reconciler load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded { source: LoadSource },
    /// Store was empty and the remote fetch failed.
    LoadedEmpty { error: String },
}

impl LoadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Loaded { .. } | LoadState::LoadedEmpty { .. })
    }
}

/// Result of a successful `load_initial_tasks` / `reload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    pub source: LoadSource,
    pub tasks: Vec<TaskRecord>,
    /// `total` reported by the remote page, when the remote was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_total: Option<i64>,
}

/// Result of a merge-by-id sync with the remote list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Remote records that were not yet in the store and got inserted.
    pub added: usize,
    /// Remote records skipped because their id already existed locally.
    pub skipped: usize,
    pub remote_total: i64,
    pub tasks: Vec<TaskRecord>,
}

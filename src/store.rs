//! The task store contract used by the reconciler.
//!
//! Storage failures stop here: every operation logs the underlying error and
//! degrades to an empty result or a no-op. Callers see a stale view rather
//! than an error.

use crate::db::Database;
use crate::types::{SyncState, TaskRecord};
use tracing::{debug, error, info};

/// Durable keyed storage for task records.
pub trait TaskStore {
    /// Clear every record and insert `records`. Records not in the set are lost.
    /// Returns false when the batch was rolled back and the store is unchanged.
    fn replace_all(&self, records: &[TaskRecord]) -> bool;

    /// All records, most recently created first.
    fn fetch_all(&self) -> Vec<TaskRecord>;

    fn get(&self, id: i64) -> Option<TaskRecord>;

    /// Add one record. The caller guarantees the id is unused.
    fn insert(&self, record: &TaskRecord);

    /// Add the records whose id is not stored yet; returns how many were added.
    fn insert_missing(&self, records: &[TaskRecord]) -> usize;

    /// Overwrite title, description and completed. `id`, `owner_id` and
    /// `created_at` are never touched. Returns false when the id is absent.
    fn update(&self, record: &TaskRecord) -> bool;

    /// Remove the record with `record.id`. Returns false when absent.
    fn delete(&self, record: &TaskRecord) -> bool;

    /// Highest stored id, 0 when empty.
    fn max_id(&self) -> i64;

    fn count(&self) -> usize;

    fn sync_state(&self) -> SyncState;

    fn set_sync_state(&self, state: SyncState);
}

impl TaskStore for Database {
    fn replace_all(&self, records: &[TaskRecord]) -> bool {
        match self.replace_all_tasks(records) {
            Ok(()) => {
                info!(count = records.len(), "Replaced all tasks");
                true
            }
            Err(e) => {
                error!(error = %e, count = records.len(), "Failed to replace tasks");
                false
            }
        }
    }

    fn fetch_all(&self) -> Vec<TaskRecord> {
        match self.list_tasks() {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Loaded tasks");
                tasks
            }
            Err(e) => {
                error!(error = %e, "Failed to load tasks");
                Vec::new()
            }
        }
    }

    fn get(&self, id: i64) -> Option<TaskRecord> {
        self.get_task(id).unwrap_or_else(|e| {
            error!(error = %e, id, "Failed to look up task");
            None
        })
    }

    fn insert(&self, record: &TaskRecord) {
        match self.insert_task(record) {
            Ok(()) => debug!(id = record.id, title = %record.title, "Inserted task"),
            Err(e) => error!(error = %e, id = record.id, "Failed to insert task"),
        }
    }

    fn insert_missing(&self, records: &[TaskRecord]) -> usize {
        self.insert_missing_tasks(records).unwrap_or_else(|e| {
            error!(error = %e, count = records.len(), "Failed to merge tasks");
            0
        })
    }

    fn update(&self, record: &TaskRecord) -> bool {
        match self.update_task(record) {
            Ok(found) => {
                if found {
                    debug!(id = record.id, title = %record.title, "Updated task");
                }
                found
            }
            Err(e) => {
                error!(error = %e, id = record.id, "Failed to update task");
                false
            }
        }
    }

    fn delete(&self, record: &TaskRecord) -> bool {
        match self.delete_task(record.id) {
            Ok(found) => {
                if found {
                    debug!(id = record.id, "Deleted task");
                }
                found
            }
            Err(e) => {
                error!(error = %e, id = record.id, "Failed to delete task");
                false
            }
        }
    }

    fn max_id(&self) -> i64 {
        self.max_task_id().unwrap_or_else(|e| {
            error!(error = %e, "Failed to read max task id");
            0
        })
    }

    fn count(&self) -> usize {
        self.count_tasks().unwrap_or_else(|e| {
            error!(error = %e, "Failed to count tasks");
            0
        })
    }

    fn sync_state(&self) -> SyncState {
        self.read_sync_state().unwrap_or_else(|e| {
            error!(error = %e, "Failed to read sync state");
            SyncState::NeverSynced
        })
    }

    fn set_sync_state(&self, state: SyncState) {
        if let Err(e) = self.write_sync_state(state) {
            error!(error = %e, ?state, "Failed to record sync state");
        }
    }
}

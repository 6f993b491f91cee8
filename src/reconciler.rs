//! Task reconciler: the single entry point for task data access.
//!
//! Owns the first-load decision (local store vs. remote import), id
//! allocation for new tasks, and the in-memory snapshot used for filtering.
//! Mutations always read and write through the store; the snapshot is
//! refreshed from the store after each one.
//!
//! One reconciler per store. Mutating operations take `&mut self`, so a
//! single owner drives it at a time.

use crate::db::now_ms;
use crate::error::{ReconcileError, ReconcileResult};
use crate::events::{EventBus, TaskEvent};
use crate::remote::{RemoteFetchError, RemoteTaskSource};
use crate::store::TaskStore;
use crate::types::{
    DEFAULT_OWNER_ID, LoadOutcome, LoadSource, LoadState, SyncReport, SyncState, TaskRecord,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// Tunables for a [`TaskReconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerOptions {
    /// Owner id given to locally created tasks.
    pub default_owner_id: i64,
    /// Re-import from the remote whenever the store is found empty, even if
    /// an import already happened. When false, an empty store that has been
    /// synced before stays empty.
    pub reimport_when_empty: bool,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            default_owner_id: DEFAULT_OWNER_ID,
            reimport_when_empty: true,
        }
    }
}

/// Coordinates a [`TaskStore`] with a [`RemoteTaskSource`] and keeps the current task list.
pub struct TaskReconciler<S, R> {
    store: S,
    remote: R,
    options: ReconcilerOptions,
    snapshot: Vec<TaskRecord>,
    state: LoadState,
    events: EventBus,
}

impl<S: TaskStore, R: RemoteTaskSource> TaskReconciler<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self {
            store,
            remote,
            options: ReconcilerOptions::default(),
            snapshot: Vec::new(),
            state: LoadState::NotLoaded,
            events: EventBus::new(),
        }
    }

    pub fn with_options(mut self, options: ReconcilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Task list as of the last load or mutation.
    pub fn snapshot(&self) -> &[TaskRecord] {
        &self.snapshot
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Open an ordered stream of this reconciler's state changes.
    pub fn subscribe(&self) -> UnboundedReceiver<TaskEvent> {
        self.events.subscribe()
    }

    fn set_state(&mut self, state: LoadState) {
        self.state = state.clone();
        self.events.publish(TaskEvent::LoadStateChanged(state));
    }

    fn refresh_snapshot(&mut self) {
        self.snapshot = self.store.fetch_all();
        self.events
            .publish(TaskEvent::TasksChanged(self.snapshot.clone()));
    }

    fn remote_failed(&self, err: &RemoteFetchError) {
        warn!(error = %err, "Remote task fetch failed");
        self.events
            .publish(TaskEvent::RemoteFetchFailed(err.to_string()));
    }

    /// Populate the task list.
    ///
    /// A non-empty store is returned as-is without touching the remote. An
    /// empty store is replaced with the remote list. If that fetch fails the
    /// (empty) store contents become the snapshot and the error is returned.
    pub async fn load_initial_tasks(&mut self) -> ReconcileResult<LoadOutcome> {
        self.set_state(LoadState::Loading);

        let local = self.store.fetch_all();
        if !local.is_empty() {
            debug!(count = local.len(), "Serving tasks from local store");
            return Ok(self.finish_local(local));
        }

        if !self.options.reimport_when_empty && self.store.sync_state().is_synced() {
            debug!("Store is empty but already synced, skipping remote");
            return Ok(self.finish_local(local));
        }

        match self.remote.fetch().await {
            Ok(page) => {
                let now = now_ms();
                let records: Vec<TaskRecord> = page
                    .todos
                    .into_iter()
                    .map(|todo| todo.into_record(now))
                    .collect();
                if self.store.replace_all(&records) {
                    let imported = self.store.count();
                    self.store.set_sync_state(SyncState::Synced { at: now, imported });
                    info!(imported, "Imported remote tasks");
                } else {
                    // Nothing was stored, so the next load must try again.
                    warn!(count = records.len(), "Remote tasks could not be stored");
                }

                self.refresh_snapshot();
                self.set_state(LoadState::Loaded {
                    source: LoadSource::RemoteImport,
                });
                Ok(LoadOutcome {
                    source: LoadSource::RemoteImport,
                    tasks: self.snapshot.clone(),
                    remote_total: Some(page.total),
                })
            }
            Err(err) => {
                self.remote_failed(&err);
                self.refresh_snapshot();
                self.set_state(LoadState::LoadedEmpty {
                    error: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    fn finish_local(&mut self, tasks: Vec<TaskRecord>) -> LoadOutcome {
        self.snapshot = tasks;
        self.events
            .publish(TaskEvent::TasksChanged(self.snapshot.clone()));
        self.set_state(LoadState::Loaded {
            source: LoadSource::Local,
        });
        LoadOutcome {
            source: LoadSource::Local,
            tasks: self.snapshot.clone(),
            remote_total: None,
        }
    }

    /// Re-run the load policy. Does not force a remote sync.
    pub async fn reload(&mut self) -> ReconcileResult<LoadOutcome> {
        self.load_initial_tasks().await
    }

    /// Create a task with the next free id (`max id + 1`, or 1 on an empty store).
    /// Fails with [`ReconcileError::IdsExhausted`] once `i64::MAX` is taken.
    pub fn create_task(&mut self, title: &str, description: &str) -> ReconcileResult<TaskRecord> {
        require_title(title)?;

        let id = self
            .store
            .max_id()
            .checked_add(1)
            .ok_or(ReconcileError::IdsExhausted)?;
        let record = TaskRecord::new(
            id,
            title,
            description,
            self.options.default_owner_id,
            now_ms(),
        );
        self.store.insert(&record);
        info!(id, title = %record.title, "Created task");

        self.refresh_snapshot();
        self.events.publish(TaskEvent::TaskUpdated(record.clone()));
        Ok(record)
    }

    /// Overwrite title, description and completed of an existing task.
    /// Returns the stored record, whose identity fields are unchanged.
    pub fn update_task(&mut self, record: &TaskRecord) -> ReconcileResult<TaskRecord> {
        require_title(&record.title)?;

        if !self.store.update(record) {
            warn!(id = record.id, "Update of unknown task");
            return Err(ReconcileError::NotFound(record.id));
        }
        let stored = self
            .store
            .get(record.id)
            .ok_or(ReconcileError::NotFound(record.id))?;

        self.refresh_snapshot();
        self.events.publish(TaskEvent::TaskUpdated(stored.clone()));
        Ok(stored)
    }

    /// Flip `completed` on the task with `id`.
    pub fn toggle_completion(&mut self, id: i64) -> ReconcileResult<TaskRecord> {
        let mut record = self.store.get(id).ok_or_else(|| {
            warn!(id, "Toggle of unknown task");
            ReconcileError::NotFound(id)
        })?;
        record.completed = !record.completed;

        if !self.store.update(&record) {
            return Err(ReconcileError::NotFound(id));
        }
        debug!(id, completed = record.completed, "Toggled task");

        self.refresh_snapshot();
        self.events.publish(TaskEvent::TaskUpdated(record.clone()));
        Ok(record)
    }

    /// Remove one task and refresh the snapshot.
    pub fn delete_task(&mut self, record: &TaskRecord) -> ReconcileResult<()> {
        let removed = self.store.delete(record);
        self.refresh_snapshot();

        if !removed {
            warn!(id = record.id, "Delete of unknown task");
            return Err(ReconcileError::NotFound(record.id));
        }
        info!(id = record.id, "Deleted task");
        self.events.publish(TaskEvent::TaskDeleted(record.id));
        Ok(())
    }

    /// Filter the current snapshot by title.
    pub fn filter(&self, query: &str) -> Vec<TaskRecord> {
        filter_tasks(query, &self.snapshot)
    }

    /// Merge the remote list into the store by id.
    ///
    /// Only remote tasks whose id is not stored yet are added. Existing tasks
    /// are never overwritten and nothing is removed. On a failed fetch the
    /// store is left untouched.
    pub async fn sync_with_remote(&mut self) -> ReconcileResult<SyncReport> {
        let page = match self.remote.fetch().await {
            Ok(page) => page,
            Err(err) => {
                self.remote_failed(&err);
                return Err(err.into());
            }
        };

        let now = now_ms();
        let remote_total = page.total;
        let records: Vec<TaskRecord> = page
            .todos
            .into_iter()
            .map(|todo| todo.into_record(now))
            .collect();

        let added = self.store.insert_missing(&records);
        let skipped = records.len().saturating_sub(added);
        self.store.set_sync_state(SyncState::Synced {
            at: now,
            imported: added,
        });
        info!(added, skipped, "Merged remote tasks");

        self.refresh_snapshot();
        Ok(SyncReport {
            added,
            skipped,
            remote_total,
            tasks: self.snapshot.clone(),
        })
    }
}

fn require_title(title: &str) -> ReconcileResult<()> {
    if title.trim().is_empty() {
        return Err(ReconcileError::missing_field("title"));
    }
    Ok(())
}

/// Case-insensitive substring match on title. An empty query returns the
/// snapshot unchanged.
pub fn filter_tasks(query: &str, snapshot: &[TaskRecord]) -> Vec<TaskRecord> {
    if query.is_empty() {
        return snapshot.to_vec();
    }
    let needle = query.to_lowercase();
    snapshot
        .iter()
        .filter(|task| task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

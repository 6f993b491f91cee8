//! Persisted remote sync bookkeeping.

use super::Database;
use crate::types::SyncState;
use anyhow::Result;
use rusqlite::params;

impl Database {
    pub fn read_sync_state(&self) -> Result<SyncState> {
        self.with_conn(|conn| {
            let (synced_at, imported): (Option<i64>, i64) = conn.query_row(
                "SELECT synced_at, imported_count FROM sync_state WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(match synced_at {
                Some(at) => SyncState::Synced {
                    at,
                    imported: imported as usize,
                },
                None => SyncState::NeverSynced,
            })
        })
    }

    pub fn write_sync_state(&self, state: SyncState) -> Result<()> {
        let (synced_at, imported) = match state {
            SyncState::NeverSynced => (None, 0),
            SyncState::Synced { at, imported } => (Some(at), imported as i64),
        };
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE sync_state SET synced_at = ?1, imported_count = ?2 WHERE id = 1",
                params![synced_at, imported],
            )?;
            Ok(())
        })
    }
}

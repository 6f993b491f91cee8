//! Task CRUD operations.

use super::Database;
use crate::types::TaskRecord;
use anyhow::Result;
use rusqlite::{Connection, Row, params};

const TASK_COLUMNS: &str = "id, title, description, completed, owner_id, created_at";

pub fn parse_task_row(row: &Row) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: row.get("completed")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
    })
}

fn insert_task_internal(conn: &Connection, task: &TaskRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO tasks (id, title, description, completed, owner_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            task.id,
            &task.title,
            &task.description,
            task.completed,
            task.owner_id,
            task.created_at,
        ],
    )?;
    Ok(())
}

impl Database {
    /// Delete every task and insert `tasks` in their place, in one transaction.
    pub fn replace_all_tasks(&self, tasks: &[TaskRecord]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tasks", [])?;
            for task in tasks {
                insert_task_internal(&tx, task)?;
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// All tasks, most recently created first. Ties break on id, highest first.
    pub fn list_tasks(&self) -> Result<Vec<TaskRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))?;
            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, id: i64) -> Result<Option<TaskRecord>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
            match stmt.query_row(params![id], parse_task_row) {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Insert one task. Fails on a duplicate id.
    pub fn insert_task(&self, task: &TaskRecord) -> Result<()> {
        self.with_conn(|conn| insert_task_internal(conn, task))
    }

    /// Insert each task whose id is not stored yet. Returns how many were inserted.
    pub fn insert_missing_tasks(&self, tasks: &[TaskRecord]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            for task in tasks {
                inserted += tx.execute(
                    "INSERT OR IGNORE INTO tasks (id, title, description, completed, owner_id, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        task.id,
                        &task.title,
                        &task.description,
                        task.completed,
                        task.owner_id,
                        task.created_at,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(inserted)
        })
    }

    /// Overwrite title, description and completed of the task with `task.id`.
    /// Returns false if no such task exists.
    pub fn update_task(&self, task: &TaskRecord) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks SET title = ?1, description = ?2, completed = ?3 WHERE id = ?4",
                params![&task.title, &task.description, task.completed, task.id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a task by id. Returns false if no such task exists.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
            Ok(changed > 0)
        })
    }

    /// Highest stored id, or 0 when there are no tasks.
    pub fn max_task_id(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let max: i64 =
                conn.query_row("SELECT COALESCE(MAX(id), 0) FROM tasks", [], |row| row.get(0))?;
            Ok(max)
        })
    }

    pub fn count_tasks(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}

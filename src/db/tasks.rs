//! Parameterized statements against the `tasks` table.

use crate::types::{NewTask, Task};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_name TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    date_added TEXT NOT NULL
);";
const INSERT_TASK: &str = "INSERT INTO tasks (task_name, description, status, date_added)
    VALUES (?1, ?2, ?3, ?4) RETURNING id";
const SELECT_TASKS: &str =
    "SELECT id, task_name, description, status, date_added FROM tasks ORDER BY id";
const SELECT_TASK: &str =
    "SELECT id, task_name, description, status, date_added FROM tasks WHERE id = ?1";
const UPDATE_TASK: &str =
    "UPDATE tasks SET task_name = ?1, description = ?2, status = ?3 WHERE id = ?4";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Create the `tasks` table if it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_TASKS)
}

fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        task_name: row.get("task_name")?,
        description: row.get("description")?,
        status: row.get("status")?,
        date_added: row.get("date_added")?,
    })
}

/// Insert a validated task and return the id storage assigned to it.
///
/// Fails with `QueryReturnedNoRows` if the generated id cannot be read back.
pub fn insert_task(conn: &Connection, task: &NewTask, date_added: &str) -> rusqlite::Result<i64> {
    let id = conn.query_row(
        INSERT_TASK,
        params![task.task_name, task.description, task.status, date_added],
        |row| row.get(0),
    )?;
    debug!(task_id = id, "Inserted task row");
    Ok(id)
}

/// All tasks in ascending id order.
pub fn select_tasks(conn: &Connection) -> rusqlite::Result<Vec<Task>> {
    let mut stmt = conn.prepare(SELECT_TASKS)?;
    let tasks = stmt
        .query_map([], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

pub fn select_task(conn: &Connection, task_id: i64) -> rusqlite::Result<Option<Task>> {
    conn.query_row(SELECT_TASK, params![task_id], parse_task_row)
        .optional()
}

/// Overwrite the mutable columns of a task. Returns the number of rows changed.
pub fn update_task(conn: &Connection, task: &Task) -> rusqlite::Result<usize> {
    let changed = conn.execute(
        UPDATE_TASK,
        params![task.task_name, task.description, task.status, task.id],
    )?;
    debug!(task_id = task.id, changed, "Updated task row");
    Ok(changed)
}

/// Remove a task. Returns the number of rows deleted.
pub fn delete_task(conn: &Connection, task_id: i64) -> rusqlite::Result<usize> {
    let deleted = conn.execute(DELETE_TASK, params![task_id])?;
    debug!(task_id, deleted, "Deleted task row");
    Ok(deleted)
}

//! The four task operations shared by the CLI and the HTTP API.
//!
//! Each operation validates its input, performs its storage calls on a
//! connection scoped to the call, and returns either the resulting task or a
//! [`TaskError`].

use crate::db::{Database, tasks};
use crate::error::{TaskError, TaskResult};
use crate::types::{Task, TaskInput};
use crate::validate::{validate_changes, validate_new, validate_task};
use chrono::{DateTime, Local, TimeZone};
use tracing::info;

/// Format of `date_added`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Every task, in ascending id order.
pub fn list_tasks(db: &Database) -> TaskResult<Vec<Task>> {
    db.with_conn(|conn| Ok(tasks::select_tasks(conn)?))
}

/// Validate and insert a new task stamped with the current local time.
pub fn create_task(db: &Database, input: TaskInput) -> TaskResult<Task> {
    create_task_at(db, input, Local::now())
}

/// Like [`create_task`], with an explicit creation moment.
pub fn create_task_at<Tz>(db: &Database, input: TaskInput, now: DateTime<Tz>) -> TaskResult<Task>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let new_task = validate_new(input)?;
    let date_added = now.format(DATE_FORMAT).to_string();

    let id = db.with_conn(|conn| {
        tasks::insert_task(conn, &new_task, &date_added).map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                TaskError::database("failed to retrieve task id after insertion")
            }
            other => other.into(),
        })
    })?;

    info!(task_id = id, "Task created");
    Ok(new_task.into_task(id, date_added))
}

/// Merge the provided fields over an existing task and store the result.
pub fn update_task(db: &Database, task_id: i64, input: TaskInput) -> TaskResult<Task> {
    let changes = validate_changes(input)?;

    let task = db.with_transaction(|conn| {
        let existing =
            tasks::select_task(conn, task_id)?.ok_or_else(|| TaskError::task_not_found(task_id))?;
        let merged = changes.apply(&existing);
        validate_task(&merged)?;
        tasks::update_task(conn, &merged)?;
        Ok(merged)
    })?;

    info!(task_id, status = %task.status, "Task updated");
    Ok(task)
}

/// Remove a task.
pub fn delete_task(db: &Database, task_id: i64) -> TaskResult<()> {
    db.with_transaction(|conn| {
        if tasks::select_task(conn, task_id)?.is_none() {
            return Err(TaskError::task_not_found(task_id));
        }
        tasks::delete_task(conn, task_id)?;
        Ok(())
    })?;

    info!(task_id, "Task deleted");
    Ok(())
}

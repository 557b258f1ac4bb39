//! Field checks applied before task data reaches storage.

use crate::error::{TaskError, TaskResult};
use crate::types::{NewTask, Task, TaskChanges, TaskInput, TaskStatus};

/// Maximum length of a task name, in characters.
pub const MAX_TASK_NAME_LEN: usize = 100;

/// Maximum length of a task description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

pub fn validate_task_name(name: &str) -> TaskResult<()> {
    if name.is_empty() {
        return Err(TaskError::invalid_value(
            "task_name",
            "task_name must not be empty",
        ));
    }
    let len = name.chars().count();
    if len > MAX_TASK_NAME_LEN {
        return Err(TaskError::invalid_value(
            "task_name",
            format!(
                "task_name must be at most {} characters (got {})",
                MAX_TASK_NAME_LEN, len
            ),
        ));
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> TaskResult<()> {
    let Some(description) = description else {
        return Ok(());
    };
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(TaskError::invalid_value(
            "description",
            format!(
                "description must be at most {} characters (got {})",
                MAX_DESCRIPTION_LEN, len
            ),
        ));
    }
    Ok(())
}

pub fn parse_status(status: &str) -> TaskResult<TaskStatus> {
    status.parse().map_err(|_| {
        let allowed: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        TaskError::invalid_value(
            "status",
            format!(
                "status must be one of {} (got '{}')",
                allowed.join(", "),
                status
            ),
        )
    })
}

/// Validate a creation payload. `task_name` is required and `status`
/// defaults to pending.
pub fn validate_new(input: TaskInput) -> TaskResult<NewTask> {
    let task_name = input
        .task_name
        .ok_or_else(|| TaskError::missing_field("task_name"))?;
    validate_task_name(&task_name)?;
    validate_description(input.description.as_deref())?;
    let status = match input.status {
        Some(ref s) => parse_status(s)?,
        None => TaskStatus::default(),
    };

    Ok(NewTask {
        task_name,
        description: input.description,
        status,
    })
}

/// Validate an update payload. Every field is optional.
pub fn validate_changes(input: TaskInput) -> TaskResult<TaskChanges> {
    if let Some(ref name) = input.task_name {
        validate_task_name(name)?;
    }
    validate_description(input.description.as_deref())?;
    let status = input.status.as_deref().map(parse_status).transpose()?;

    Ok(TaskChanges {
        task_name: input.task_name,
        description: input.description,
        status,
    })
}

/// Validate a complete task, as produced by merging changes over a stored row.
pub fn validate_task(task: &Task) -> TaskResult<()> {
    validate_task_name(&task.task_name)?;
    validate_description(task.description.as_deref())
}

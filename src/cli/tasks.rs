//! Runners for the task subcommands.
//!
//! Each runner performs one CRUD operation against its own connection and
//! writes human-readable output to `out`. Confirmations are colored when
//! `color` is set: green for add, yellow for update, red for remove.

use crate::crud;
use crate::db::Database;
use crate::types::{Task, TaskInput};
use anyhow::Result;
use crossterm::style::{Color, Stylize};
use prettytable::{Table, row};
use std::io::Write;

/// Render tasks as a table.
pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["id", "task_name", "description", "status", "date_added"]);
    for task in tasks {
        table.add_row(row![
            task.id,
            task.task_name,
            task.description.as_deref().unwrap_or(""),
            task.status,
            task.date_added
        ]);
    }
    table
}

fn confirm(out: &mut impl Write, message: String, tint: Color, color: bool) -> Result<()> {
    if color {
        writeln!(out, "{}", message.with(tint))?;
    } else {
        writeln!(out, "{}", message)?;
    }
    Ok(())
}

pub fn run_show_list(db: &Database, out: &mut impl Write) -> Result<()> {
    let tasks = crud::list_tasks(db)?;
    task_table(&tasks).print(out)?;
    Ok(())
}

pub fn run_add_item(
    db: &Database,
    task_name: &str,
    description: &str,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let task = crud::create_task(db, TaskInput::new(task_name).with_description(description))?;
    confirm(
        out,
        format!("Task {} added successfully", task.id),
        Color::Green,
        color,
    )
}

/// Only the status can be changed from the command line.
pub fn run_update_item(
    db: &Database,
    task_id: i64,
    new_status: &str,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let task = crud::update_task(db, task_id, TaskInput::default().with_status(new_status))?;
    confirm(
        out,
        format!("Task {} updated successfully ({})", task.id, task.status),
        Color::Yellow,
        color,
    )
}

pub fn run_remove_item(
    db: &Database,
    task_id: i64,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    crud::delete_task(db, task_id)?;
    confirm(
        out,
        format!("Task {} removed successfully", task_id),
        Color::Red,
        color,
    )
}

//! CLI command definitions for tasklist
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod tasks;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Personal task list: command-line tools and HTTP API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every task as a table
    ShowList,

    /// Add a task with status "pending"
    AddItem {
        /// Task name (1-100 characters)
        task_name: String,
        /// Task description (up to 255 characters)
        description: String,
    },

    /// Change the status of a task
    UpdateItem {
        /// Task id
        task_id: i64,
        /// One of: pending, in-progress, testing, done
        new_status: String,
    },

    /// Delete a task
    RemoveItem {
        /// Task id
        task_id: i64,
    },

    /// Serve the JSON HTTP API
    Serve(ServeArgs),
}

/// Arguments for the serve subcommand
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

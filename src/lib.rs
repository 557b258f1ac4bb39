//! Personal task list library.
//!
//! This module exports the core components for the binary and for tests.

pub mod cli;
pub mod config;
pub mod crud;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod types;
pub mod validate;

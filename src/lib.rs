//! todo-sync library
//!
//! A local to-do task store (SQLite) with a reconciler that seeds it from a
//! read-only remote task list and serves all task operations.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod format;
pub mod logging;
pub mod reconciler;
pub mod remote;
pub mod store;
pub mod types;

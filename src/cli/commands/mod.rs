//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which resolves the
//! target environment once and hands every remote command a
//! [`SyncContext`]. Batch commands print one line per item followed by a
//! summary; any failed item makes the command exit with status 1.

pub mod attach;
pub mod config;
pub mod create;
pub mod detach;
pub mod dispatcher;
pub mod display;
pub mod fetch_ids;
pub mod import;
pub mod update;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, SyncContext};

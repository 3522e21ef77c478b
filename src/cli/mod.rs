//! Command-line interface for tmplsync.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    AttachArgs, Cli, Commands, ConfigAction, ConfigArgs, CreateArgs, DetachArgs, FetchIdsArgs,
    ImportArgs, UpdateArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult, SyncContext};

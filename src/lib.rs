//! tmplsync - keep a local repository of accounting templates in sync
//! with a remote platform.
//!
//! Templates (reconciliation texts, shared parts, export files and account
//! templates) live on disk as a `config.json` plus body files. Each template
//! can exist in many firm and partner environments, each with its own
//! remote id.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`gateway`] - Platform API access
//! - [`settings`] - User-level settings and default environments
//! - [`store`] - Local template repository
//! - [`sync`] - Import, publish, id discovery and shared part links
//! - [`template`] - Template kinds and environments
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use tmplsync::template::{Environment, TemplateKind};
//!
//! let env = Environment::partner(5);
//! assert_eq!(env.to_string(), "partner 5");
//! assert_eq!(TemplateKind::SharedPart.handle_field(), "name");
//! ```

pub mod cli;
pub mod error;
pub mod gateway;
pub mod settings;
pub mod store;
pub mod sync;
pub mod template;
pub mod ui;

pub use error::{Result, SyncError};

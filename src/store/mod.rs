//! Local template storage.
//!
//! This module provides:
//! - [`ConfigStore`] for per-template `config.json` records
//! - [`BodyStore`] for template bodies and the per-kind save routine
//! - [`Repository`], the file-backed implementation of both
//! - [`ConfigRecord`] and the `used_in` relation types in [`record`]
//!
//! # Example
//!
//! ```
//! use tmplsync::store::{ConfigStore, Repository, ScopedIds};
//! use tmplsync::template::{Environment, TemplateKind};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let repo = Repository::new(temp.path());
//!
//! let mut config = repo.read(TemplateKind::SharedPart, "sp_x").unwrap();
//! config.set_remote_id(Environment::firm(111), 7);
//! repo.write(TemplateKind::SharedPart, "sp_x", &config).unwrap();
//!
//! assert!(repo.exists(TemplateKind::SharedPart, "sp_x"));
//! assert_eq!(repo.list_handles(TemplateKind::SharedPart).unwrap(), vec!["sp_x"]);
//! ```

pub mod record;
pub mod repository;

pub use record::{ConfigRecord, DetachChange, IdMap, ScopedIds, SharedPartLink, UsageEntry};
pub use repository::Repository;

use crate::error::Result;
use crate::gateway::RemoteRecord;
use crate::template::{Environment, TemplateBody, TemplateKind};

/// Read/write access to config records.
///
/// A config is always read, fully mutated in memory and written back as
/// one unit.
pub trait ConfigStore {
    /// Read the config for a template. Missing configs read as empty.
    fn read(&self, kind: TemplateKind, handle: &str) -> Result<ConfigRecord>;

    /// Replace the config for a template.
    fn write(&self, kind: TemplateKind, handle: &str, config: &ConfigRecord) -> Result<()>;

    /// Whether the template is present in the repository.
    fn exists(&self, kind: TemplateKind, handle: &str) -> bool;

    /// All handles of `kind`, sorted.
    fn list_handles(&self, kind: TemplateKind) -> Result<Vec<String>>;
}

/// Template bodies and their materialization from remote records.
pub trait BodyStore {
    /// Assemble the payload for create/update. `None` means the template
    /// has no body locally and the operation should be skipped.
    fn read_body(&self, kind: TemplateKind, handle: &str) -> Result<Option<TemplateBody>>;

    /// Write a remote record to disk and record its id for `env`.
    /// Returns the handle it was stored under.
    fn save_remote(
        &self,
        env: Environment,
        kind: TemplateKind,
        record: &RemoteRecord,
    ) -> Result<String>;
}

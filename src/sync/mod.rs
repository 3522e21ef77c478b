//! Synchronization core.
//!
//! Each component borrows a [`PlatformGateway`](crate::gateway::PlatformGateway)
//! and the local stores for the duration of one command:
//!
//! - [`IdentityResolver`] maps handles to remote ids, discovering on miss
//! - [`BulkImporter`] pulls templates page by page
//! - [`UsageGraph`] attaches and detaches shared parts
//! - [`Publisher`] updates and creates remote templates
//! - [`IdDiscovery`] refreshes ids for a whole kind
//!
//! All work is sequential. Batch operations report per item through
//! [`BatchReport`] and never stop at the first failing item.

pub mod discovery;
pub mod importer;
pub mod publisher;
pub mod report;
pub mod resolver;
pub mod usage;

pub use discovery::IdDiscovery;
pub use importer::{BulkImporter, RemotePages};
pub use publisher::{Created, Publisher, CREATE_MESSAGE, DEFAULT_UPDATE_MESSAGE};
pub use report::{BatchReport, ItemOutcome, ItemStatus};
pub use resolver::IdentityResolver;
pub use usage::UsageGraph;

//! Platform gateway.
//!
//! [`PlatformGateway`] is the contract the synchronization core needs from
//! the remote platform. Every operation is scoped by an [`Environment`].
//!
//! - [`HttpGateway`] talks to the platform API over HTTPS
//! - [`MemoryGateway`] is an in-memory platform for tests
//!
//! Status codes are returned to the caller rather than turned into
//! errors: attach, detach, create and update each interpret them
//! differently. Network failures surface as
//! [`SyncError::TransportFailure`](crate::error::SyncError::TransportFailure).

pub mod http;
pub mod memory;

pub use http::{AuthHeader, HttpGateway};
pub use memory::{GatewayCall, MemoryGateway, Operation};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::template::{Environment, RemoteId, TemplateBody, TemplateKind};

/// A record as returned by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRecord(pub Value);

impl RemoteRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The platform id of this record.
    pub fn id(&self) -> Option<RemoteId> {
        self.0.get("id").and_then(Value::as_u64)
    }

    /// The handle/name of this record for the given kind.
    pub fn handle(&self, kind: TemplateKind) -> Option<&str> {
        self.0.get(kind.handle_field()).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Top-level fields, if the record is an object.
    pub fn fields(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.as_object()
    }
}

/// Status and body of a mutating platform call.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub data: Value,
}

impl GatewayResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// 2xx-class response.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// The response body as a record.
    pub fn record(&self) -> RemoteRecord {
        RemoteRecord(self.data.clone())
    }
}

/// Remote operations required by the synchronization core.
pub trait PlatformGateway {
    /// Find a record of `kind` whose handle/name equals `text`.
    fn find_by_handle_or_name(
        &self,
        env: Environment,
        kind: TemplateKind,
        text: &str,
    ) -> Result<Option<RemoteRecord>>;

    /// Read one record by id. `None` when the platform has no such record.
    fn read_by_id(
        &self,
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
    ) -> Result<Option<RemoteRecord>>;

    /// Read one page of the collection. An empty page ends the collection.
    fn read_page(
        &self,
        env: Environment,
        kind: TemplateKind,
        page: u32,
    ) -> Result<Vec<RemoteRecord>>;

    fn create(
        &self,
        env: Environment,
        kind: TemplateKind,
        body: &TemplateBody,
    ) -> Result<GatewayResponse>;

    fn update(
        &self,
        env: Environment,
        kind: TemplateKind,
        id: RemoteId,
        body: &TemplateBody,
    ) -> Result<GatewayResponse>;

    /// Attach a shared part to a template of `kind`.
    fn attach(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> Result<GatewayResponse>;

    /// Detach a shared part from a template of `kind`.
    fn detach(
        &self,
        env: Environment,
        kind: TemplateKind,
        shared_part_id: RemoteId,
        template_id: RemoteId,
    ) -> Result<GatewayResponse>;
}

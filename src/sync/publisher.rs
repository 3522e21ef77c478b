//! Pushing local templates to the platform.

use serde_json::json;

use crate::error::{Result, SyncError};
use crate::gateway::{GatewayResponse, PlatformGateway};
use crate::store::{BodyStore, ConfigStore, ScopedIds};
use crate::template::{Environment, RemoteId, Scope, TemplateKind};

use super::report::{BatchReport, ItemOutcome};
use super::resolver::IdentityResolver;

/// Version comment used when the caller gives none.
pub const DEFAULT_UPDATE_MESSAGE: &str = "Updated with tmplsync";

/// Version comment stamped on newly created templates.
pub const CREATE_MESSAGE: &str = "Created with tmplsync";

/// Result of [`Publisher::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    New(RemoteId),
    /// The platform already had a template with this handle.
    AlreadyExists(Option<RemoteId>),
}

pub struct Publisher<'a> {
    gateway: &'a dyn PlatformGateway,
    configs: &'a dyn ConfigStore,
    bodies: &'a dyn BodyStore,
    resolver: IdentityResolver<'a>,
}

impl<'a> Publisher<'a> {
    pub fn new(
        gateway: &'a dyn PlatformGateway,
        configs: &'a dyn ConfigStore,
        bodies: &'a dyn BodyStore,
    ) -> Self {
        Self {
            gateway,
            configs,
            bodies,
            resolver: IdentityResolver::new(gateway, configs),
        }
    }

    /// Update the remote copy of a template from the local body.
    ///
    /// Requires the id to be recorded already; never discovers.
    pub fn publish(
        &self,
        env: Environment,
        kind: TemplateKind,
        handle: &str,
        message: Option<&str>,
    ) -> Result<RemoteId> {
        let id = self.resolver.require_cached(env, kind, handle)?;
        let mut body = self
            .bodies
            .read_body(kind, handle)?
            .ok_or_else(|| missing(kind, handle))?;

        body.insert(
            "version_comment".to_string(),
            json!(message.unwrap_or(DEFAULT_UPDATE_MESSAGE)),
        );
        if env.scope == Scope::Partner {
            body.insert("version_significant_change".to_string(), json!(false));
        }

        let response = self.gateway.update(env, kind, id, &body)?;
        if !response.is_success() {
            return Err(SyncError::http(
                response.status,
                format!("updating {} '{}' was rejected", kind, handle),
            ));
        }
        if !echoes(&response, kind, handle, id) {
            return Err(SyncError::InconsistentResponse {
                kind,
                handle: handle.to_string(),
                field: kind.handle_field().to_string(),
            });
        }

        tracing::info!("Updated {} '{}' in {}", kind, handle, env);
        Ok(id)
    }

    /// Publish every local template of `kind`.
    pub fn publish_all(
        &self,
        env: Environment,
        kind: TemplateKind,
        message: Option<&str>,
        mut on_item: impl FnMut(&ItemOutcome),
    ) -> Result<BatchReport> {
        let mut report = BatchReport::new();
        for handle in self.configs.list_handles(kind)? {
            let outcome = match self.bodies.read_body(kind, &handle) {
                Ok(None) => ItemOutcome::skipped(kind, handle, "no template body"),
                Ok(Some(_)) => {
                    let result = self.publish(env, kind, &handle, message);
                    ItemOutcome::from_result(kind, handle, result)
                }
                Err(e) => ItemOutcome::from_result::<()>(kind, handle, Err(e)),
            };
            on_item(&outcome);
            report.push(outcome);
        }
        Ok(report)
    }

    /// Create a template in a firm, unless it already exists there.
    pub fn create(&self, firm_id: u64, kind: TemplateKind, handle: &str) -> Result<Created> {
        let env = Environment::firm(firm_id);

        if let Some(existing) = self.gateway.find_by_handle_or_name(env, kind, handle)? {
            tracing::warn!(
                "{} '{}' already exists in {}; not creating it again",
                kind,
                handle,
                env
            );
            return Ok(Created::AlreadyExists(existing.id()));
        }

        let mut body = self
            .bodies
            .read_body(kind, handle)?
            .ok_or_else(|| missing(kind, handle))?;
        body.insert("version_comment".to_string(), json!(CREATE_MESSAGE));

        let response = self.gateway.create(env, kind, &body)?;
        if !response.is_success() {
            return Err(SyncError::http(
                response.status,
                format!("creating {} '{}' was rejected", kind, handle),
            ));
        }
        let id = response
            .record()
            .id()
            .ok_or_else(|| SyncError::InconsistentResponse {
                kind,
                handle: handle.to_string(),
                field: "id".to_string(),
            })?;

        let mut config = self.configs.read(kind, handle)?;
        config.set_remote_id(env, id);
        self.configs.write(kind, handle, &config)?;

        tracing::info!("Created {} '{}' in {} with id {}", kind, handle, env, id);
        Ok(Created::New(id))
    }

    /// Create every local template of `kind` that the firm lacks.
    pub fn create_all(
        &self,
        firm_id: u64,
        kind: TemplateKind,
        mut on_item: impl FnMut(&ItemOutcome),
    ) -> Result<BatchReport> {
        let mut report = BatchReport::new();
        for handle in self.configs.list_handles(kind)? {
            let outcome = match self.create(firm_id, kind, &handle) {
                Ok(Created::AlreadyExists(_)) => {
                    ItemOutcome::skipped(kind, handle, "already exists")
                }
                result => ItemOutcome::from_result(kind, handle, result),
            };
            on_item(&outcome);
            report.push(outcome);
        }
        Ok(report)
    }
}

fn missing(kind: TemplateKind, handle: &str) -> SyncError {
    SyncError::MissingTemplate {
        kind,
        handle: handle.to_string(),
    }
}

/// The response names the artifact that was sent.
fn echoes(response: &GatewayResponse, kind: TemplateKind, handle: &str, id: RemoteId) -> bool {
    let record = response.record();
    record.handle(kind) == Some(handle) || record.id() == Some(id)
}

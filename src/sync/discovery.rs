//! Batch recovery of remote ids for a repository cloned without them.

use crate::error::Result;
use crate::gateway::PlatformGateway;
use crate::store::ConfigStore;
use crate::template::{Environment, RemoteId, TemplateKind};

use super::report::{BatchReport, ItemOutcome};
use super::resolver::IdentityResolver;

pub struct IdDiscovery<'a> {
    configs: &'a dyn ConfigStore,
    resolver: IdentityResolver<'a>,
}

impl<'a> IdDiscovery<'a> {
    pub fn new(gateway: &'a dyn PlatformGateway, configs: &'a dyn ConfigStore) -> Self {
        Self {
            configs,
            resolver: IdentityResolver::new(gateway, configs),
        }
    }

    /// Look up one handle on the platform, even if an id is cached.
    pub fn discover_one(
        &self,
        env: Environment,
        kind: TemplateKind,
        handle: &str,
    ) -> Result<RemoteId> {
        self.resolver.discover(env, kind, handle)
    }

    /// Look up every local template of `kind`.
    pub fn discover_all(
        &self,
        env: Environment,
        kind: TemplateKind,
        mut on_item: impl FnMut(&ItemOutcome),
    ) -> Result<BatchReport> {
        let mut report = BatchReport::new();
        for handle in self.configs.list_handles(kind)? {
            let result = self.discover_one(env, kind, &handle);
            let outcome = ItemOutcome::from_result(kind, handle, result);
            on_item(&outcome);
            report.push(outcome);
        }
        Ok(report)
    }
}

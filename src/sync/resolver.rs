//! Identity resolution.
//!
//! Maps a local `(kind, handle)` to its remote id in an environment. The
//! local config is a cache: a hit answers without touching the network, a
//! miss asks the platform and persists the discovered id into the map
//! for the environment's scope. Every component that needs a remote id
//! goes through [`IdentityResolver`] so missing mappings heal on use.

use crate::error::{Result, SyncError};
use crate::gateway::PlatformGateway;
use crate::store::{ConfigStore, ScopedIds};
use crate::template::{Environment, RemoteId, TemplateKind};

pub struct IdentityResolver<'a> {
    gateway: &'a dyn PlatformGateway,
    configs: &'a dyn ConfigStore,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(gateway: &'a dyn PlatformGateway, configs: &'a dyn ConfigStore) -> Self {
        Self { gateway, configs }
    }

    /// The locally recorded id, without any remote call.
    pub fn cached(
        &self,
        env: Environment,
        kind: TemplateKind,
        handle: &str,
    ) -> Result<Option<RemoteId>> {
        Ok(self.configs.read(kind, handle)?.remote_id(env))
    }

    /// The locally recorded id, or `MissingLocalIdentity`.
    pub fn require_cached(
        &self,
        env: Environment,
        kind: TemplateKind,
        handle: &str,
    ) -> Result<RemoteId> {
        self.cached(env, kind, handle)?
            .ok_or_else(|| SyncError::MissingLocalIdentity {
                kind,
                handle: handle.to_string(),
                env,
            })
    }

    /// Cached id if present, otherwise discover it remotely.
    pub fn resolve(&self, env: Environment, kind: TemplateKind, handle: &str) -> Result<RemoteId> {
        if let Some(id) = self.cached(env, kind, handle)? {
            tracing::debug!("{} '{}' is {} in {} (cached)", kind, handle, id, env);
            return Ok(id);
        }
        self.discover(env, kind, handle)
    }

    /// Look the handle up on the platform and persist the id.
    ///
    /// `NotFound` leaves the config untouched.
    pub fn discover(&self, env: Environment, kind: TemplateKind, handle: &str) -> Result<RemoteId> {
        let record = self
            .gateway
            .find_by_handle_or_name(env, kind, handle)?
            .ok_or_else(|| SyncError::NotFound {
                kind,
                handle: handle.to_string(),
                env,
            })?;
        let id = record.id().ok_or_else(|| SyncError::InconsistentResponse {
            kind,
            handle: handle.to_string(),
            field: "id".to_string(),
        })?;

        let mut config = self.configs.read(kind, handle)?;
        if config.remote_id(env) != Some(id) {
            config.set_remote_id(env, id);
            self.configs.write(kind, handle, &config)?;
            tracing::info!("Recorded {} id {} for '{}' in {}", kind, id, handle, env);
        }
        Ok(id)
    }
}

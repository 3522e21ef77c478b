//! Usage-graph synchronization: attaching shared parts to templates.
//!
//! The platform owns the real link; locally the shared part's `used_in`
//! list and the template's `shared_parts` list mirror it per environment.
//! Local state only changes after the platform accepted the change, and
//! each config is read, mutated and written back as one unit.

use crate::error::{Result, SyncError};
use crate::gateway::PlatformGateway;
use crate::store::{ConfigStore, DetachChange};
use crate::template::{Environment, Scope, TemplateKind};

use super::report::{BatchReport, ItemOutcome};
use super::resolver::IdentityResolver;

pub struct UsageGraph<'a> {
    gateway: &'a dyn PlatformGateway,
    configs: &'a dyn ConfigStore,
    resolver: IdentityResolver<'a>,
}

impl<'a> UsageGraph<'a> {
    pub fn new(gateway: &'a dyn PlatformGateway, configs: &'a dyn ConfigStore) -> Self {
        Self {
            gateway,
            configs,
            resolver: IdentityResolver::new(gateway, configs),
        }
    }

    /// Attach `shared_part` to the template `(kind, template)` in `env`.
    pub fn attach(
        &self,
        env: Environment,
        shared_part: &str,
        template: &str,
        kind: TemplateKind,
    ) -> Result<()> {
        check_combination(env, kind)?;
        self.require_local(kind, template)?;
        self.require_local(TemplateKind::SharedPart, shared_part)?;

        let template_id = self.resolver.resolve(env, kind, template)?;
        let shared_part_id = self
            .resolver
            .resolve(env, TemplateKind::SharedPart, shared_part)?;

        let response = self.gateway.attach(env, kind, shared_part_id, template_id)?;
        if !response.is_success() {
            return Err(SyncError::http(
                response.status,
                format!(
                    "attaching shared part '{}' to {} '{}' was rejected",
                    shared_part, kind, template
                ),
            ));
        }

        let mut part_config = self.configs.read(TemplateKind::SharedPart, shared_part)?;
        part_config.record_usage(kind, template, env, template_id);
        self.configs
            .write(TemplateKind::SharedPart, shared_part, &part_config)?;

        let mut template_config = self.configs.read(kind, template)?;
        template_config.record_shared_part(shared_part, env, shared_part_id);
        self.configs.write(kind, template, &template_config)?;

        tracing::info!(
            "Attached shared part '{}' to {} '{}' in {}",
            shared_part,
            kind,
            template,
            env
        );
        Ok(())
    }

    /// Both sides of a link must be local templates before anything is resolved.
    fn require_local(&self, kind: TemplateKind, handle: &str) -> Result<()> {
        if self.configs.exists(kind, handle) {
            Ok(())
        } else {
            Err(SyncError::MissingTemplate {
                kind,
                handle: handle.to_string(),
            })
        }
    }

    /// Detach `shared_part` from the template `(kind, template)` in `env`.
    ///
    /// Ids come from local configs only. A 404 from the platform means
    /// the link is already gone; local bookkeeping still runs.
    pub fn detach(
        &self,
        env: Environment,
        shared_part: &str,
        template: &str,
        kind: TemplateKind,
    ) -> Result<DetachChange> {
        check_attachable(kind)?;

        let template_id = self.resolver.require_cached(env, kind, template)?;
        let shared_part_id =
            self.resolver
                .require_cached(env, TemplateKind::SharedPart, shared_part)?;

        let response = self.gateway.detach(env, kind, shared_part_id, template_id)?;
        if response.is_not_found() {
            tracing::warn!(
                "Shared part '{}' was not attached to {} '{}' in {}; cleaning up locally",
                shared_part,
                kind,
                template,
                env
            );
        } else if !response.is_success() {
            return Err(SyncError::http(
                response.status,
                format!(
                    "detaching shared part '{}' from {} '{}' was rejected",
                    shared_part, kind, template
                ),
            ));
        }

        let mut part_config = self.configs.read(TemplateKind::SharedPart, shared_part)?;
        let change = part_config.detach_usage(kind, template, env, template_id);
        if change != DetachChange::Absent {
            self.configs
                .write(TemplateKind::SharedPart, shared_part, &part_config)?;
        }

        let mut template_config = self.configs.read(kind, template)?;
        if template_config.detach_shared_part(shared_part, env, shared_part_id)
            != DetachChange::Absent
        {
            self.configs.write(kind, template, &template_config)?;
        }

        tracing::info!(
            "Detached shared part '{}' from {} '{}' in {} ({:?})",
            shared_part,
            kind,
            template,
            env,
            change
        );
        Ok(change)
    }

    /// Replay every `used_in` entry of every local shared part.
    ///
    /// Entries without a handle and templates missing from the
    /// repository are skipped. `force` is accepted but attaching is
    /// already safe to repeat, so it changes nothing.
    pub fn attach_all(
        &self,
        env: Environment,
        force: bool,
        mut on_item: impl FnMut(&ItemOutcome),
    ) -> Result<BatchReport> {
        if force {
            tracing::debug!("force has no effect on attach-all");
        }

        let mut report = BatchReport::new();
        let mut push = |outcome: ItemOutcome| {
            on_item(&outcome);
            report.push(outcome);
        };

        for shared_part in self.configs.list_handles(TemplateKind::SharedPart)? {
            let entries = match self.configs.read(TemplateKind::SharedPart, &shared_part) {
                Ok(config) => config.used_in,
                Err(e) => {
                    push(ItemOutcome::from_result::<()>(
                        TemplateKind::SharedPart,
                        shared_part,
                        Err(e),
                    ));
                    continue;
                }
            };

            for entry in entries {
                let Some(template) = entry.handle else {
                    push(ItemOutcome::skipped(
                        entry.kind,
                        format!("{} -> ?", shared_part),
                        "usage entry has no handle",
                    ));
                    continue;
                };
                let label = format!("{} -> {}", shared_part, template);
                if !self.configs.exists(entry.kind, &template) {
                    push(ItemOutcome::skipped(
                        entry.kind,
                        label,
                        "template is not in the repository",
                    ));
                    continue;
                }

                let result = self.attach(env, &shared_part, &template, entry.kind);
                push(ItemOutcome::from_result(entry.kind, label, result));
            }
        }

        Ok(report)
    }
}

fn check_attachable(kind: TemplateKind) -> Result<()> {
    if kind == TemplateKind::SharedPart {
        return Err(SyncError::UnsupportedCombination {
            message: "shared parts cannot be attached to other shared parts".to_string(),
        });
    }
    Ok(())
}

/// Reject combinations the platform cannot link, before any remote call.
fn check_combination(env: Environment, kind: TemplateKind) -> Result<()> {
    check_attachable(kind)?;
    if env.scope == Scope::Partner && kind == TemplateKind::ExportFile {
        return Err(SyncError::UnsupportedCombination {
            message: "shared parts cannot be attached to export files in a partner environment"
                .to_string(),
        });
    }
    Ok(())
}

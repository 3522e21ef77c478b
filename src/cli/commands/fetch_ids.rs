//! Fetch-ids command implementation.
//!
//! Looks local templates up on the platform by handle or name and stores
//! the ids found for the active environment.

use crate::cli::args::FetchIdsArgs;
use crate::error::Result;
use crate::sync::IdDiscovery;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, SyncContext};
use super::display::{finish_single, show_outcome, show_summary};

/// The fetch-ids command implementation.
pub struct FetchIdsCommand<'a> {
    ctx: SyncContext<'a>,
    args: FetchIdsArgs,
}

impl<'a> FetchIdsCommand<'a> {
    pub fn new(ctx: SyncContext<'a>, args: FetchIdsArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for FetchIdsCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (kind, env) = (self.args.kind, self.ctx.env);
        let discovery = IdDiscovery::new(self.ctx.gateway, &self.ctx.repo);

        match &self.args.handle {
            Some(handle) => {
                let result = discovery.discover_one(env, kind, handle);
                finish_single(ui, result, |id| {
                    format!("{} '{}' has id {} in {}", kind, handle, id, env)
                })
            }
            None => {
                let report = discovery.discover_all(env, kind, |outcome| show_outcome(ui, outcome))?;
                Ok(show_summary(ui, "Fetched ids", &report))
            }
        }
    }
}

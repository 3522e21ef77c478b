//! Detach command implementation.

use crate::cli::args::DetachArgs;
use crate::error::Result;
use crate::store::DetachChange;
use crate::sync::UsageGraph;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, SyncContext};
use super::display::finish_single;

/// The detach command implementation.
///
/// Uses only ids already stored locally; it never searches the platform.
pub struct DetachCommand<'a> {
    ctx: SyncContext<'a>,
    args: DetachArgs,
}

impl<'a> DetachCommand<'a> {
    pub fn new(ctx: SyncContext<'a>, args: DetachArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for DetachCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = self.ctx.env;
        let DetachArgs {
            shared_part,
            kind,
            handle,
        } = &self.args;
        let graph = UsageGraph::new(self.ctx.gateway, &self.ctx.repo);

        let result = graph.detach(env, shared_part, handle, *kind);
        finish_single(ui, result, |change| {
            let pair = format!(
                "shared part '{}' from {} '{}' in {}",
                shared_part, kind, handle, env
            );
            match change {
                DetachChange::Removed => format!("Detached {}", pair),
                DetachChange::Pruned => {
                    format!("Detached {}; links in other environments are kept", pair)
                }
                DetachChange::Absent => {
                    format!("Detached {}; no local link was recorded", pair)
                }
            }
        })
    }
}

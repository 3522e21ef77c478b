//! Attach command implementation.
//!
//! `tmplsync attach` links a shared part to one template, or with
//! `--all` re-applies every link recorded in local shared part configs.

use crate::cli::args::AttachArgs;
use crate::error::Result;
use crate::sync::UsageGraph;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, SyncContext};
use super::display::{finish_single, show_outcome, show_summary};

/// The attach command implementation.
pub struct AttachCommand<'a> {
    ctx: SyncContext<'a>,
    args: AttachArgs,
}

impl<'a> AttachCommand<'a> {
    pub fn new(ctx: SyncContext<'a>, args: AttachArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for AttachCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = self.ctx.env;
        let graph = UsageGraph::new(self.ctx.gateway, &self.ctx.repo);

        if self.args.all {
            let mut spinner = ui.start_spinner(&format!("Attaching shared parts in {}", env));
            let result = graph.attach_all(env, self.args.force, |outcome| {
                spinner.set_message(&format!("Attaching {}", outcome.label));
            });
            let report = match result {
                Ok(report) => {
                    spinner.finish_clear();
                    report
                }
                Err(e) => {
                    spinner.finish_error("Attach stopped");
                    return Err(e);
                }
            };
            for outcome in &report.items {
                show_outcome(ui, outcome);
            }
            return Ok(show_summary(ui, "Attached", &report));
        }

        let (Some(shared_part), Some(kind), Some(handle)) =
            (&self.args.shared_part, self.args.kind, &self.args.handle)
        else {
            return Err(anyhow::anyhow!("attach needs --shared-part, --kind and --handle").into());
        };

        let result = graph.attach(env, shared_part, handle, kind);
        finish_single(ui, result, |_| {
            format!(
                "Attached shared part '{}' to {} '{}' in {}",
                shared_part, kind, handle, env
            )
        })
    }
}

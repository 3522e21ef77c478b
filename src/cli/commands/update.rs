//! Update command implementation.
//!
//! `tmplsync update` publishes local templates over their remote copies.
//! It never looks ids up: templates must have been imported, created or
//! passed through `fetch-ids` first.

use crate::cli::args::UpdateArgs;
use crate::error::Result;
use crate::sync::Publisher;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, SyncContext};
use super::display::{cancelled, finish_single, show_outcome, show_summary};

/// The update command implementation.
pub struct UpdateCommand<'a> {
    ctx: SyncContext<'a>,
    args: UpdateArgs,
}

impl<'a> UpdateCommand<'a> {
    pub fn new(ctx: SyncContext<'a>, args: UpdateArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for UpdateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (kind, env) = (self.args.kind, self.ctx.env);
        let message = self.args.message.as_deref();
        let publisher = Publisher::new(self.ctx.gateway, &self.ctx.repo, &self.ctx.repo);

        if let Some(handle) = &self.args.handle {
            let result = publisher.publish(env, kind, handle, message);
            return finish_single(ui, result, |_| {
                format!("Updated {} '{}' in {}", kind, handle, env)
            });
        }

        let question = format!(
            "Overwrite every {} in {} with the local version?",
            kind, env
        );
        if !self.ctx.confirm(ui, "update_all", &question)? {
            return Ok(cancelled(ui));
        }
        let report = publisher.publish_all(env, kind, message, |outcome| show_outcome(ui, outcome))?;
        Ok(show_summary(ui, "Updated", &report))
    }
}

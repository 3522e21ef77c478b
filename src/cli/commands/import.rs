//! Import command implementation.
//!
//! `tmplsync import` downloads one template (by handle or id) or every
//! template of a kind into the local repository.

use crate::cli::args::ImportArgs;
use crate::error::Result;
use crate::sync::{BatchReport, BulkImporter};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, SyncContext};
use super::display::{cancelled, finish_single, show_outcome, show_summary};

/// The import command implementation.
pub struct ImportCommand<'a> {
    ctx: SyncContext<'a>,
    args: ImportArgs,
}

impl<'a> ImportCommand<'a> {
    pub fn new(ctx: SyncContext<'a>, args: ImportArgs) -> Self {
        Self { ctx, args }
    }

    fn import_all(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (kind, env) = (self.args.kind, self.ctx.env);
        let question = format!(
            "Import every {} from {} and overwrite local copies?",
            kind, env
        );
        if !self.ctx.confirm(ui, "import_all", &question)? {
            return Ok(cancelled(ui));
        }

        let importer = BulkImporter::new(self.ctx.gateway, &self.ctx.repo);
        let mut spinner = ui.start_spinner(&format!("Importing {} templates from {}", kind, env));
        let result = importer.import_all(env, kind, |outcome| {
            spinner.set_message(&format!("Importing {}", outcome.label));
        });
        let report: BatchReport = match result {
            Ok(report) => {
                spinner.finish_clear();
                report
            }
            Err(e) => {
                spinner.finish_error("Import stopped");
                return Err(e);
            }
        };

        if report.nothing_found {
            ui.warning(&format!("No {} templates found in {}", kind, env));
            return Ok(CommandResult::success());
        }
        for outcome in &report.items {
            show_outcome(ui, outcome);
        }
        Ok(show_summary(ui, "Imported", &report))
    }
}

impl Command for ImportCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (kind, env) = (self.args.kind, self.ctx.env);
        let importer = BulkImporter::new(self.ctx.gateway, &self.ctx.repo);

        if let Some(handle) = &self.args.handle {
            let result = importer.import_one(env, kind, handle);
            return finish_single(ui, result, |saved| {
                format!("Imported {} '{}' from {}", kind, saved, env)
            });
        }
        if let Some(id) = self.args.id {
            let result = importer.import_by_id(env, kind, id);
            return finish_single(ui, result, |saved| {
                format!("Imported {} '{}' (id {}) from {}", kind, saved, id, env)
            });
        }
        self.import_all(ui)
    }
}

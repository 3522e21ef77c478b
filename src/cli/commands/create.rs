//! Create command implementation.

use crate::cli::args::CreateArgs;
use crate::error::{Result, SyncError};
use crate::sync::{Created, Publisher};
use crate::template::Scope;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, SyncContext};
use super::display::{finish_single, show_outcome, show_summary};

/// The create command implementation. Firms only.
pub struct CreateCommand<'a> {
    ctx: SyncContext<'a>,
    args: CreateArgs,
}

impl<'a> CreateCommand<'a> {
    pub fn new(ctx: SyncContext<'a>, args: CreateArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for CreateCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let kind = self.args.kind;
        let env = self.ctx.env;
        if env.scope != Scope::Firm {
            let err: Result<()> = Err(SyncError::UnsupportedCombination {
                message: "templates can only be created in a firm".to_string(),
            });
            return finish_single(ui, err, |_| String::new());
        }

        let publisher = Publisher::new(self.ctx.gateway, &self.ctx.repo, &self.ctx.repo);

        if let Some(handle) = &self.args.handle {
            return match publisher.create(env.id, kind, handle) {
                Ok(Created::AlreadyExists(_)) => {
                    ui.warning(&format!(
                        "{} '{}' already exists in {}; use update instead",
                        kind, handle, env
                    ));
                    Ok(CommandResult::success())
                }
                result => finish_single(ui, result, |created| match created {
                    Created::New(id) => format!("Created {} '{}' in {} (id {})", kind, handle, env, id),
                    Created::AlreadyExists(_) => String::new(),
                }),
            };
        }

        let report = publisher.create_all(env.id, kind, |outcome| show_outcome(ui, outcome))?;
        Ok(show_summary(ui, "Created", &report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::store::{ConfigRecord, ConfigStore, Repository};
    use crate::template::{Environment, TemplateKind};
    use crate::ui::MockUI;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const EXPORT: TemplateKind = TemplateKind::ExportFile;

    fn local(temp: &TempDir, name: &str) {
        let repo = Repository::new(temp.path());
        repo.write(EXPORT, name, &ConfigRecord::default()).unwrap();
        fs::write(repo.template_dir(EXPORT, name).join("main.liquid"), "x").unwrap();
    }

    fn run(
        temp: &TempDir,
        gateway: &MemoryGateway,
        env: Environment,
        handle: Option<&str>,
    ) -> (CommandResult, MockUI) {
        let ctx = SyncContext {
            repo: Repository::new(temp.path()),
            gateway,
            env,
            assume_yes: false,
        };
        let args = CreateArgs {
            kind: EXPORT,
            handle: handle.map(String::from),
            all: handle.is_none(),
        };
        let mut ui = MockUI::new();
        let result = CreateCommand::new(ctx, args).execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn partner_scope_is_rejected() {
        let temp = TempDir::new().unwrap();
        local(&temp, "export_z");
        let gateway = MemoryGateway::new();

        let (result, ui) = run(&temp, &gateway, Environment::partner(5), Some("export_z"));

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("only be created in a firm"));
        assert!(gateway.calls().is_empty());
    }

    #[test]
    fn creates_single_template() {
        let temp = TempDir::new().unwrap();
        local(&temp, "export_z");
        let gateway = MemoryGateway::new();

        let (result, ui) = run(&temp, &gateway, Environment::firm(111), Some("export_z"));

        assert!(result.success);
        assert!(ui.has_success("Created export file 'export_z' in firm 111"));
    }

    #[test]
    fn existing_template_only_warns() {
        let temp = TempDir::new().unwrap();
        local(&temp, "export_z");
        let gateway = MemoryGateway::new();
        gateway.insert(Environment::firm(111), EXPORT, json!({"id": 5, "name": "export_z"}));

        let (result, ui) = run(&temp, &gateway, Environment::firm(111), Some("export_z"));

        assert!(result.success);
        assert!(ui.has_warning("already exists"));
    }

    #[test]
    fn create_all_summarizes() {
        let temp = TempDir::new().unwrap();
        local(&temp, "a");
        local(&temp, "b");
        let gateway = MemoryGateway::new();

        let (result, ui) = run(&temp, &gateway, Environment::firm(111), None);

        assert!(result.success);
        assert!(ui.has_success("Created: 2 succeeded, 0 skipped, 0 failed"));
    }
}

//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`SyncContext`] bundling what remote commands work against
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::gateway::PlatformGateway;
use crate::settings::Settings;
use crate::store::Repository;
use crate::sync::BatchReport;
use crate::template::Environment;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Process exit status. Codes outside `0..=255` become 1.
    pub fn exit_status(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }

    /// Success only if no item of the batch failed.
    pub fn from_report(report: &BatchReport) -> Self {
        if report.is_success() {
            Self::success()
        } else {
            Self::failure(1)
        }
    }
}

/// Everything a remote command works against.
pub struct SyncContext<'a> {
    pub repo: Repository,
    pub gateway: &'a dyn PlatformGateway,
    pub env: Environment,
    /// Skip confirmations.
    pub assume_yes: bool,
}

impl SyncContext<'_> {
    /// Ask before a bulk operation unless `--yes` was given.
    pub fn confirm(&self, ui: &mut dyn UserInterface, key: &str, question: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        ui.confirm(key, question)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    settings_path: PathBuf,
    settings: Settings,
    gateway: Box<dyn PlatformGateway>,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    ///
    /// `settings` is the file loaded from `settings_path`; it is written
    /// back there by the `config` command.
    pub fn new(
        project_root: PathBuf,
        settings_path: PathBuf,
        settings: Settings,
        gateway: Box<dyn PlatformGateway>,
    ) -> Self {
        Self {
            project_root,
            settings_path,
            settings,
            gateway,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn context(&self, cli: &Cli) -> Result<SyncContext<'_>> {
        let env = self
            .settings
            .resolve_environment(&self.project_root, cli.firm, cli.partner)?;
        tracing::debug!("Working against {}", env);
        Ok(SyncContext {
            repo: Repository::new(self.project_root.clone()),
            gateway: self.gateway.as_ref(),
            env,
            assume_yes: cli.yes,
        })
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Config(args) => {
                let cmd = super::config::ConfigCommand::new(
                    &self.project_root,
                    &self.settings_path,
                    self.settings.clone(),
                    args.clone(),
                );
                cmd.execute(ui)
            }
            Commands::Import(args) => {
                let cmd = super::import::ImportCommand::new(self.context(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Update(args) => {
                let cmd = super::update::UpdateCommand::new(self.context(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Create(args) => {
                let cmd = super::create::CreateCommand::new(self.context(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Attach(args) => {
                let cmd = super::attach::AttachCommand::new(self.context(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::Detach(args) => {
                let cmd = super::detach::DetachCommand::new(self.context(cli)?, args.clone());
                cmd.execute(ui)
            }
            Commands::FetchIds(args) => {
                let cmd = super::fetch_ids::FetchIdsCommand::new(self.context(cli)?, args.clone());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::gateway::MemoryGateway;
    use crate::sync::ItemOutcome;
    use crate::template::TemplateKind;
    use crate::ui::MockUI;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn exit_status_does_not_wrap() {
        assert_eq!(CommandResult::success().exit_status(), 0);
        assert_eq!(CommandResult::failure(2).exit_status(), 2);
        assert_eq!(CommandResult::failure(256).exit_status(), 1);
        assert_eq!(CommandResult::failure(-1).exit_status(), 1);
    }

    #[test]
    fn failed_item_fails_the_command() {
        let mut report = BatchReport::new();
        report.push(ItemOutcome::succeeded(TemplateKind::SharedPart, "a"));
        report.push(ItemOutcome::failed(
            TemplateKind::SharedPart,
            "b",
            SyncError::http(500, "boom"),
        ));
        assert_eq!(CommandResult::from_report(&report).exit_code, 1);
    }

    #[test]
    fn remote_command_without_environment_fails() {
        let temp = TempDir::new().unwrap();
        let dispatcher = CommandDispatcher::new(
            temp.path().to_path_buf(),
            temp.path().join("settings.yml"),
            Settings::default(),
            Box::new(MemoryGateway::new()),
        );
        let cli = Cli::parse_from(["tmplsync", "fetch-ids", "--kind", "shared-part"]);
        let mut ui = MockUI::new();

        let err = dispatcher.dispatch(&cli, &mut ui).unwrap_err();
        assert!(matches!(err, SyncError::NoEnvironment));
    }

    #[test]
    fn default_firm_is_used() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.set_default_firm(temp.path(), 111);
        let dispatcher = CommandDispatcher::new(
            temp.path().to_path_buf(),
            temp.path().join("settings.yml"),
            settings,
            Box::new(MemoryGateway::new()),
        );
        let cli = Cli::parse_from(["tmplsync", "fetch-ids", "--kind", "shared-part"]);

        let ctx = dispatcher.context(&cli).unwrap();
        assert_eq!(ctx.env, Environment::firm(111));
        assert_eq!(dispatcher.project_root(), temp.path());
    }
}

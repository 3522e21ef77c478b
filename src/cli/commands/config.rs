//! Config command implementation.
//!
//! The `tmplsync config` command stores and shows the default firm and
//! partner for the current project.

use std::path::{Path, PathBuf};

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::error::Result;
use crate::settings::Settings;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    settings_path: PathBuf,
    settings: Settings,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, settings_path: &Path, settings: Settings, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            settings_path: settings_path.to_path_buf(),
            settings,
            args,
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        settings.save(&self.settings_path)?;
        tracing::debug!("Saved settings to {}", self.settings_path.display());
        Ok(())
    }

    fn show(ui: &mut dyn UserInterface, label: &str, value: Option<u64>) -> CommandResult {
        match value {
            Some(id) => {
                ui.message(&id.to_string());
                CommandResult::success()
            }
            None => {
                ui.warning(&format!("No default {} set for this project", label));
                CommandResult::failure(1)
            }
        }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let project = self.project_root.as_path();

        match &self.args.action {
            ConfigAction::SetFirm { id } => {
                let mut settings = self.settings.clone();
                settings.set_default_firm(project, *id);
                self.save(&settings)?;
                ui.success(&format!("Default firm set to {}", id));
            }
            ConfigAction::SetPartner { id } => {
                let mut settings = self.settings.clone();
                settings.set_default_partner(project, *id);
                self.save(&settings)?;
                ui.success(&format!("Default partner set to {}", id));
            }
            ConfigAction::GetFirm => {
                return Ok(Self::show(ui, "firm", self.settings.default_firm(project)));
            }
            ConfigAction::GetPartner => {
                return Ok(Self::show(
                    ui,
                    "partner",
                    self.settings.default_partner(project),
                ));
            }
            ConfigAction::List => {
                ui.show_header(&format!("Settings ({})", self.settings_path.display()));
                ui.message(&format!("host: {}", self.settings.host));
                let firm = self.settings.default_firm(project);
                let partner = self.settings.default_partner(project);
                ui.message(&format!(
                    "firm: {}",
                    firm.map_or_else(|| "-".to_string(), |id| id.to_string())
                ));
                ui.message(&format!(
                    "partner: {}",
                    partner.map_or_else(|| "-".to_string(), |id| id.to_string())
                ));
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn run(temp: &TempDir, settings: Settings, action: ConfigAction) -> (CommandResult, MockUI) {
        let path = temp.path().join("settings.yml");
        let cmd = ConfigCommand::new(temp.path(), &path, settings, ConfigArgs { action });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn set_firm_is_persisted() {
        let temp = TempDir::new().unwrap();

        let (result, ui) = run(&temp, Settings::default(), ConfigAction::SetFirm { id: 111 });

        assert!(result.success);
        assert!(ui.has_success("Default firm set to 111"));
        let saved = Settings::load(&temp.path().join("settings.yml")).unwrap();
        assert_eq!(saved.default_firm(temp.path()), Some(111));
    }

    #[test]
    fn get_partner_prints_stored_id() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.set_default_partner(temp.path(), 5);

        let (result, ui) = run(&temp, settings, ConfigAction::GetPartner);

        assert!(result.success);
        assert_eq!(ui.messages(), ["5"]);
    }

    #[test]
    fn get_firm_without_default_fails() {
        let temp = TempDir::new().unwrap();

        let (result, ui) = run(&temp, Settings::default(), ConfigAction::GetFirm);

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_warning("No default firm"));
    }

    #[test]
    fn list_shows_host_and_defaults() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.set_default_firm(temp.path(), 111);

        let (_, ui) = run(&temp, settings, ConfigAction::List);

        assert!(ui.messages().iter().any(|m| m.starts_with("host: https://")));
        assert!(ui.messages().iter().any(|m| m == "firm: 111"));
        assert!(ui.messages().iter().any(|m| m == "partner: -"));
        assert!(ui.headers()[0].contains("settings.yml"));
    }
}

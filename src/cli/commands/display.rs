//! Shared display helpers for batch outcomes.

use crate::error::Result;
use crate::sync::{BatchReport, ItemOutcome, ItemStatus};
use crate::ui::UserInterface;

use super::dispatcher::CommandResult;

/// Report the result of a single-item operation.
///
/// Expected failures print one line and fail the command; anything else
/// goes to the top-level handler.
pub fn finish_single<T>(
    ui: &mut dyn UserInterface,
    result: Result<T>,
    on_success: impl FnOnce(T) -> String,
) -> Result<CommandResult> {
    match result {
        Ok(value) => {
            ui.success(&on_success(value));
            Ok(CommandResult::success())
        }
        Err(e) if e.is_expected() => {
            ui.error(&e.to_string());
            Ok(CommandResult::failure(1))
        }
        Err(e) => Err(e),
    }
}

/// Tell the user a declined confirmation stopped the command.
pub fn cancelled(ui: &mut dyn UserInterface) -> CommandResult {
    ui.warning("Cancelled; nothing was changed");
    CommandResult::failure(1)
}

/// Print one item's line, styled by status.
pub fn show_outcome(ui: &mut dyn UserInterface, outcome: &ItemOutcome) {
    let line = outcome.line();
    match outcome.status {
        ItemStatus::Succeeded => ui.success(&line),
        ItemStatus::Skipped(_) => ui.warning(&line),
        ItemStatus::Failed(_) => ui.error(&line),
    }
}

/// Print the closing count line and turn the report into a result.
pub fn show_summary(ui: &mut dyn UserInterface, verb: &str, report: &BatchReport) -> CommandResult {
    let line = format!(
        "{}: {} succeeded, {} skipped, {} failed",
        verb,
        report.succeeded(),
        report.skipped(),
        report.failed()
    );
    if report.is_success() {
        ui.success(&line);
    } else {
        ui.error(&line);
    }
    CommandResult::from_report(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::template::TemplateKind;
    use crate::ui::MockUI;

    const SP: TemplateKind = TemplateKind::SharedPart;

    #[test]
    fn outcome_uses_matching_ui_method() {
        let mut ui = MockUI::new();
        show_outcome(&mut ui, &ItemOutcome::succeeded(SP, "a"));
        show_outcome(&mut ui, &ItemOutcome::skipped(SP, "b", "no body"));
        show_outcome(
            &mut ui,
            &ItemOutcome::failed(SP, "c", SyncError::http(500, "boom")),
        );

        assert!(ui.has_success("shared part 'a'"));
        assert!(ui.has_warning("'b' skipped: no body"));
        assert!(ui.has_error("'c' failed"));
    }

    #[test]
    fn expected_single_failure_is_reported() {
        let mut ui = MockUI::new();
        let result: Result<()> = Err(SyncError::NotFound {
            kind: SP,
            handle: "sp_x".to_string(),
            env: crate::template::Environment::firm(1),
        });
        let outcome = finish_single(&mut ui, result, |_| "never".to_string()).unwrap();

        assert_eq!(outcome.exit_code, 1);
        assert!(ui.has_error("not found"));
    }

    #[test]
    fn unexpected_single_failure_propagates() {
        let mut ui = MockUI::new();
        let result: Result<()> = Err(SyncError::http(500, "boom"));
        assert!(finish_single(&mut ui, result, |_| String::new()).is_err());
        assert!(ui.errors().is_empty());
    }

    #[test]
    fn summary_counts_and_exit_code() {
        let mut ui = MockUI::new();
        let mut report = BatchReport::new();
        report.push(ItemOutcome::succeeded(SP, "a"));
        report.push(ItemOutcome::skipped(SP, "b", "exists"));

        let result = show_summary(&mut ui, "Created", &report);

        assert!(result.success);
        assert!(ui.has_success("Created: 1 succeeded, 1 skipped, 0 failed"));
    }
}

//! Per-item outcomes of batch operations.

use crate::error::{Result, SyncError};
use crate::template::TemplateKind;

/// What happened to one item of a batch.
#[derive(Debug)]
pub enum ItemStatus {
    Succeeded,
    Skipped(String),
    Failed(SyncError),
}

/// Outcome for one handle (or shared part/template pair).
#[derive(Debug)]
pub struct ItemOutcome {
    pub kind: TemplateKind,
    pub label: String,
    pub status: ItemStatus,
}

impl ItemOutcome {
    pub fn succeeded(kind: TemplateKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            status: ItemStatus::Succeeded,
        }
    }

    pub fn skipped(kind: TemplateKind, label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            status: ItemStatus::Skipped(reason.into()),
        }
    }

    pub fn failed(kind: TemplateKind, label: impl Into<String>, error: SyncError) -> Self {
        Self {
            kind,
            label: label.into(),
            status: ItemStatus::Failed(error),
        }
    }

    /// Build an outcome from the result of a single-item operation.
    pub fn from_result<T>(kind: TemplateKind, label: impl Into<String>, result: Result<T>) -> Self {
        match result {
            Ok(_) => Self::succeeded(kind, label),
            Err(error) => {
                let label = label.into();
                if error.is_expected() {
                    tracing::warn!("{} '{}': {}", kind, label, error);
                } else {
                    tracing::error!("{} '{}': {:?}", kind, label, error);
                }
                Self::failed(kind, label, error)
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, ItemStatus::Failed(_))
    }

    /// One line for the batch summary.
    pub fn line(&self) -> String {
        match &self.status {
            ItemStatus::Succeeded => format!("{} '{}'", self.kind, self.label),
            ItemStatus::Skipped(reason) => {
                format!("{} '{}' skipped: {}", self.kind, self.label, reason)
            }
            ItemStatus::Failed(error) => format!("{} '{}' failed: {}", self.kind, self.label, error),
        }
    }
}

/// Outcomes of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemOutcome>,
    /// The remote collection was empty (imports only).
    pub nothing_found: bool,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ItemOutcome) {
        self.items.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Succeeded))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.is_failure()).count()
    }

    /// No item failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

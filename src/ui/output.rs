//! Output mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One line per item plus the summary.
    #[default]
    Normal,
    /// Warnings, errors and the summary only.
    Quiet,
}

impl OutputMode {
    pub fn from_flags(quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Check if this mode shows per-item status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

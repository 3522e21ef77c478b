//! Template kinds, scopes and environment identities.
//!
//! Every remote operation is parameterized by an [`Environment`]: a
//! [`Scope`] (firm or partner account) plus the numeric environment id.
//! [`TemplateKind`] carries the per-kind naming tables used by the local
//! repository layout, the platform API and the `used_in` relation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a record on the platform.
pub type RemoteId = u64;

/// Payload sent to the platform on create/update.
pub type TemplateBody = serde_json::Map<String, serde_json::Value>;

/// Whether an environment is a firm or a partner account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Firm,
    Partner,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Firm => "firm",
            Self::Partner => "partner",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A specific firm or partner account on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Environment {
    pub scope: Scope,
    pub id: u64,
}

impl Environment {
    pub fn new(scope: Scope, id: u64) -> Self {
        Self { scope, id }
    }

    pub fn firm(id: u64) -> Self {
        Self::new(Scope::Firm, id)
    }

    pub fn partner(id: u64) -> Self {
        Self::new(Scope::Partner, id)
    }

    /// Key used in the `id` / `partnerId` maps of config files.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.scope, self.id)
    }
}

/// The four kinds of template artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateKind {
    ReconciliationText,
    SharedPart,
    ExportFile,
    AccountTemplate,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        Self::ReconciliationText,
        Self::SharedPart,
        Self::ExportFile,
        Self::AccountTemplate,
    ];

    /// Kinds a shared part can be attached to.
    pub const ATTACHABLE: [TemplateKind; 3] = [
        Self::ReconciliationText,
        Self::ExportFile,
        Self::AccountTemplate,
    ];

    /// Top-level directory in the local repository.
    pub fn directory(&self) -> &'static str {
        match self {
            Self::ReconciliationText => "reconciliation_texts",
            Self::SharedPart => "shared_parts",
            Self::ExportFile => "export_files",
            Self::AccountTemplate => "account_templates",
        }
    }

    /// Collection segment in platform URLs.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::ReconciliationText => "reconciliations",
            Self::SharedPart => "shared_parts",
            Self::ExportFile => "export_files",
            Self::AccountTemplate => "account_templates",
        }
    }

    /// Field holding the handle/name in remote records and config files.
    pub fn handle_field(&self) -> &'static str {
        match self {
            Self::ReconciliationText => "handle",
            Self::SharedPart | Self::ExportFile => "name",
            Self::AccountTemplate => "name_nl",
        }
    }

    /// Spelling used for `type` inside `used_in` entries.
    pub fn usage_type(&self) -> &'static str {
        match self {
            Self::ReconciliationText => "reconciliationText",
            Self::SharedPart => "sharedPart",
            Self::ExportFile => "exportFile",
            Self::AccountTemplate => "accountTemplate",
        }
    }

    /// Parse a `type` value from a local or remote `used_in` item.
    pub fn from_usage_type(value: &str) -> Option<Self> {
        match value {
            "reconciliationText" | "reconciliation" | "reconciliation_text" => {
                Some(Self::ReconciliationText)
            }
            "exportFile" | "export_file" => Some(Self::ExportFile),
            "accountTemplate" | "account_template" => Some(Self::AccountTemplate),
            _ => None,
        }
    }

    /// Human-readable label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ReconciliationText => "reconciliation text",
            Self::SharedPart => "shared part",
            Self::ExportFile => "export file",
            Self::AccountTemplate => "account template",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "reconciliation" | "reconciliation-text" => Ok(Self::ReconciliationText),
            "shared-part" => Ok(Self::SharedPart),
            "export-file" => Ok(Self::ExportFile),
            "account-template" => Ok(Self::AccountTemplate),
            _ => Err(format!("unknown template kind: {}", s)),
        }
    }
}

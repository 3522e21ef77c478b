//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::template::TemplateKind;

/// tmplsync - keep a local template repository in sync with the platform.
#[derive(Debug, Parser)]
#[command(name = "tmplsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the template repository (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Firm to work against
    #[arg(long, global = true, value_name = "ID", conflicts_with = "partner")]
    pub firm: Option<u64>,

    /// Partner environment to work against
    #[arg(long, global = true, value_name = "ID")]
    pub partner: Option<u64>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Only show warnings, errors and summaries
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to the settings file
    #[arg(long, global = true, env = "TMPLSYNC_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// API token (overrides the one in the settings file)
    #[arg(long, global = true, env = "TMPLSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download templates from the platform
    Import(ImportArgs),

    /// Publish local templates to the platform
    Update(UpdateArgs),

    /// Create local templates in a firm
    Create(CreateArgs),

    /// Attach a shared part to a template
    Attach(AttachArgs),

    /// Detach a shared part from a template
    Detach(DetachArgs),

    /// Look up and store remote ids for local templates
    FetchIds(FetchIdsArgs),

    /// Manage default environments
    Config(ConfigArgs),
}

/// Arguments for the `import` command.
#[derive(Debug, Clone, clap::Args)]
#[command(group(ArgGroup::new("target").required(true).args(["handle", "id", "all"])))]
pub struct ImportArgs {
    /// Template kind: reconciliation, shared-part, export-file, account-template
    #[arg(short, long)]
    pub kind: TemplateKind,

    /// Handle or name of the template
    #[arg(long)]
    pub handle: Option<String>,

    /// Remote id of the template
    #[arg(long)]
    pub id: Option<u64>,

    /// Import every template of this kind
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, clap::Args)]
#[command(group(ArgGroup::new("target").required(true).args(["handle", "all"])))]
pub struct UpdateArgs {
    /// Template kind: reconciliation, shared-part, export-file, account-template
    #[arg(short, long)]
    pub kind: TemplateKind,

    /// Handle or name of the template
    #[arg(long)]
    pub handle: Option<String>,

    /// Publish every local template of this kind
    #[arg(long)]
    pub all: bool,

    /// Version comment stored with the update
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for the `create` command.
#[derive(Debug, Clone, clap::Args)]
#[command(group(ArgGroup::new("target").required(true).args(["handle", "all"])))]
pub struct CreateArgs {
    /// Template kind: reconciliation, shared-part, export-file, account-template
    #[arg(short, long)]
    pub kind: TemplateKind,

    /// Handle or name of the template
    #[arg(long)]
    pub handle: Option<String>,

    /// Create every local template of this kind
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `attach` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AttachArgs {
    /// Name of the shared part
    #[arg(long, required_unless_present = "all")]
    pub shared_part: Option<String>,

    /// Kind of the template to attach to
    #[arg(short, long, required_unless_present = "all")]
    pub kind: Option<TemplateKind>,

    /// Handle or name of the template to attach to
    #[arg(long, required_unless_present = "all")]
    pub handle: Option<String>,

    /// Replay every `used_in` entry of every local shared part
    #[arg(long, conflicts_with_all = ["shared_part", "kind", "handle"])]
    pub all: bool,

    /// Re-attach pairs that are already linked
    #[arg(long, requires = "all")]
    pub force: bool,
}

/// Arguments for the `detach` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DetachArgs {
    /// Name of the shared part
    #[arg(long)]
    pub shared_part: String,

    /// Kind of the template to detach from
    #[arg(short, long)]
    pub kind: TemplateKind,

    /// Handle or name of the template to detach from
    #[arg(long)]
    pub handle: String,
}

/// Arguments for the `fetch-ids` command.
#[derive(Debug, Clone, clap::Args)]
pub struct FetchIdsArgs {
    /// Template kind: reconciliation, shared-part, export-file, account-template
    #[arg(short, long)]
    pub kind: TemplateKind,

    /// Only this template (default: every local template of the kind)
    #[arg(long)]
    pub handle: Option<String>,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Default-environment actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Store the default firm for this project
    SetFirm { id: u64 },

    /// Show the default firm for this project
    GetFirm,

    /// Store the default partner for this project
    SetPartner { id: u64 },

    /// Show the default partner for this project
    GetPartner,

    /// Show every stored default
    List,
}

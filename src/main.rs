//! tmplsync CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tmplsync::cli::{Cli, CommandDispatcher};
use tmplsync::gateway::{AuthHeader, HttpGateway};
use tmplsync::settings::Settings;
use tmplsync::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tmplsync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tmplsync=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// CI runners never answer prompts.
fn is_ci() -> bool {
    std::env::var_os("CI").is_some()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("tmplsync starting with command: {:?}", cli.command);

    let output_mode = OutputMode::from_flags(cli.quiet);
    let mut ui = create_ui(!is_ci(), output_mode);

    let settings_path = cli.settings.clone().unwrap_or_else(Settings::default_path);
    let settings = match Settings::load(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };

    let mut gateway = match HttpGateway::new(&settings.host) {
        Ok(gateway) => gateway,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(1);
        }
    };
    if let Some(token) = cli.token.as_deref().or(settings.token.as_deref()) {
        gateway = gateway.with_auth(AuthHeader::bearer(token));
    } else {
        tracing::debug!("No API token configured; requests are unauthenticated");
    }

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let dispatcher = CommandDispatcher::new(project_root, settings_path, settings, Box::new(gateway));

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_status()),
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}

//! Smpatch CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use smpatch::cli::Cli;
use smpatch::runner;
use smpatch::ui::Ui;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("smpatch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smpatch=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("smpatch starting with args: {:?}", cli);

    let ui = Ui::new(cli.output_mode());
    ui.status(&format!(
        "{} v{}\nI patch (upgrade) live ScoreMaster installations.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));

    match runner::run(&cli.run_options(), &ui) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            ui.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

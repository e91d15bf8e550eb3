use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quote_cli::app::App;
use quote_cli::cli::Cli;
use quote_cli::config::AppConfig;

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to the configured level.
/// * Strips timestamps and target names to keep CLI output clean.
/// * Writes to stderr so `--json` output stays parseable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.load_options()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);
    debug!(backend = %config.database.backend, "configuration loaded");

    let app = App::new(config, cli.json);
    match app.run(&cli.command).await {
        Ok(rendered) => {
            print!("{rendered}");
            if cli.json {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(code = err.code(), "command failed: {err}");
            let rendered = app.render_error(&err);
            if cli.json {
                println!("{rendered}");
            } else {
                eprint!("{rendered}");
            }
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::CommandError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match dispatch::run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, cli.json);
            ExitCode::from(e.exit_status())
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `-v` logs at debug, `-q` at error, and the
/// default is warn.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(e: &CommandError, json: bool) {
    if json {
        let error_json = serde_json::json!({
            "error": {
                "code": e.code(),
                "message": e.to_string(),
            }
        });
        match serde_json::to_string_pretty(&error_json) {
            Ok(text) => eprintln!("{text}"),
            Err(_) => eprintln!("{error_json}"),
        }
    } else {
        eprintln!("Error: {e}");
    }
}

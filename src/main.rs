//! Binary entrypoint for the `reflabel` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reflabel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Recording is handled in commands::dispatch via REFLABEL_RECORD=<dir>.
    match reflabel::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

//! siteprep - prepare a freshly rented host for a web project

use std::process::ExitCode;

use clap::Parser;
use siteprep_cli::cli::Cli;
use siteprep_cli::domain::{ConfigError, InputError};
use siteprep_cli::output::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json_mode {
                match json::format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if e.downcast_ref::<InputError>().is_some() {
        "INPUT"
    } else if e.downcast_ref::<ConfigError>().is_some() {
        "CONFIG"
    } else {
        "ERROR"
    }
}

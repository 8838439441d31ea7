//! Deployment Verifier - Entry Point
//!
//! Checks a single deployment (or the latest one) and prints a report.
//! Exit codes: 0 success, 1 failure, 2 still building or queued.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use deploy_verifier::app::settings::Settings;
use deploy_verifier::logs::init_logging;
use deploy_verifier::utils::version_info;
use deploy_verifier::{check_deployment, format_report, Outcome, Target};

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let mut cli_args: HashMap<String, String> = HashMap::new();
    for arg in env::args().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --json
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version info: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli_args).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {:#}", "Verification failed:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli_args: &HashMap<String, String>) -> anyhow::Result<Outcome> {
    let settings = Settings::from_env().context("Invalid configuration")?;

    if let Err(e) = init_logging(settings.logging.clone()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let target = cli_args
        .get("target")
        .map(|t| t.parse::<Target>())
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let id = cli_args.get("id").map(String::as_str);

    let result = check_deployment(&settings.verifier, id, target).await?;

    if cli_args.contains_key("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_report(&result));
        let headline = match result.status {
            Outcome::Success => result.status.to_string().green(),
            Outcome::Building | Outcome::Queued => result.status.to_string().yellow(),
            Outcome::Failed | Outcome::Error => result.status.to_string().red(),
        };
        eprintln!("{} {}", "Deployment check:".bold(), headline.bold());
    }

    Ok(result.status)
}

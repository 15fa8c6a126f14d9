use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use field_builder::{
    builder::{HttpSubmitter, SubmitError},
    cli::{build_form, submit_form, Cli, Commands, SubmitReport},
    config::Config,
    tui,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "field_builder=info");
    }

    let config = Config::from_env()?.with_endpoint(cli.endpoint.clone());
    config.validate()?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            init_file_logging(&config);
            info!("Launching field builder TUI");

            let submitter = Arc::new(HttpSubmitter::from_config(&config)?);
            match tui::run_tui(config, submitter).await {
                Ok(_) => info!("Field builder exited successfully"),
                Err(e) => {
                    error!("Field builder encountered an error: {}", e);
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Submit {
            label,
            default,
            choices,
            required,
            order,
            dry_run,
        } => {
            init_console_logging();

            let order = Commands::parse_order(&order)?;
            let (mut form, rejected) = build_form(&label, &default, &choices, required, order);
            for skipped in &rejected {
                eprintln!("Skipped choice '{}': {}", skipped.choice, skipped.error);
            }

            let submitter = HttpSubmitter::from_config(&config)?;
            match submit_form(&mut form, &submitter, dry_run).await {
                Ok(SubmitReport::Preview(payload)) => {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                Ok(SubmitReport::Saved(response)) => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                Err(SubmitError::Blocked(errors)) => {
                    for (field, err) in errors.iter() {
                        eprintln!("{}: {}", field.as_str(), err);
                    }
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Log to a file so the terminal display is left alone
fn init_file_logging(config: &Config) {
    let directory = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = config
        .log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "field_builder.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

fn init_console_logging() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

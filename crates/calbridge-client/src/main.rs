//! calbridge CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use calbridge_client::cli::{Cli, Command, ConfigAction};
use calbridge_client::commands::convert::{self, ConvertOptions};
use calbridge_client::config::ClientConfig;
use calbridge_client::error::{ClientError, ClientResult};
use calbridge_client::io::{is_ics_path, read_input};
use calbridge_core::tracing::init_tracing;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    // Load configuration
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().unwrap_or_default()
    };

    // Initialize tracing
    init_tracing(config.tracing_config(cli.debug, cli.log_format))
        .map_err(|e| ClientError::Config(format!("failed to initialize logging: {}", e)))?;

    let options = || ConvertOptions::from_config(&config, cli.preserve_extensions, cli.compact);

    match cli.command {
        Command::ToJscal { input, ics } => {
            let content = read_input(&input)?;
            let output = convert::to_jscal(&content, ics || is_ics_path(&input), &options()?)?;
            println!("{}", output);
            Ok(())
        }
        Command::ToLegacy { input, ics } => {
            let content = read_input(&input)?;
            let output = convert::to_legacy(&content, ics, &options()?)?;
            if ics {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
            Ok(())
        }
        Command::Roundtrip { input, ics } => {
            let content = read_input(&input)?;
            let output = convert::roundtrip(&content, ics || is_ics_path(&input), &options()?)?;
            println!("{}", output);
            Ok(())
        }
        Command::Classify { url } => {
            println!("{}", convert::classify(&url));
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => calbridge_client::commands::config::dump(&config),
            ConfigAction::Validate => calbridge_client::commands::config::validate(&config),
            ConfigAction::Path => calbridge_client::commands::config::path(),
        },
    }
}

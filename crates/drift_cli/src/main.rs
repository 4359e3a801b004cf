use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drift_cli::commands::check_cmd::{self, CheckArgs, EXIT_ERROR};
use drift_cli::commands::validate_cmd::{self, ValidateArgs};

/// Drift: detect drift between desired and actual Azure DevOps security configuration
#[derive(Parser)]
#[command(name = "drift")]
#[command(
    about = "Detect drift between desired and actual Azure DevOps security configuration",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the configured desired state against Azure DevOps
    Check(CheckArgs),

    /// Validate a configuration file without contacting Azure DevOps
    Validate(ValidateArgs),

    /// Show the CLI version
    Version,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries the report.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("DRIFT_LOG"))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Check(args) => match check_cmd::execute(args).await {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                error!("Error: {e}");
                eprintln!("Error: {e}");
                std::process::exit(EXIT_ERROR);
            }
        },
        Commands::Validate(args) => {
            if let Err(e) = validate_cmd::execute(args) {
                error!("Error: {e}");
                eprintln!("Error: {e}");
                std::process::exit(EXIT_ERROR);
            }
        }
        Commands::Version => {
            println!(
                "drift version {}",
                option_env!("DRIFT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
        }
    }
}

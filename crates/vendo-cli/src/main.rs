//! Vendo CLI - vendor npm packages with pinned checksums

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod error;
mod exit_codes;

use error::CliError;

#[derive(Parser)]
#[command(name = "vendo")]
#[command(author = "Vendo Contributors")]
#[command(version)]
#[command(about = "Vendor npm packages with pinned checksums", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and install the vendored packages
    Install {
        /// Vendor file to use instead of the discovered one
        #[arg(long, value_name = "FILENAME")]
        vendor_file: Option<PathBuf>,

        /// Skip all prompts
        #[arg(short = 'y', long)]
        yes: bool,

        /// Re-download cached metadata and archives
        #[arg(long)]
        refresh: bool,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    let log_level = if cli.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::internal(format!("Failed to create async runtime: {e}")))?;

    match cli.command {
        Commands::Install {
            vendor_file,
            yes,
            refresh,
        } => runtime.block_on(commands::install::run(vendor_file.as_deref(), yes, refresh)),
    }
}

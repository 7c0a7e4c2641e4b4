//! ## ruskvader-cli
//! **Command-line control surface**
//!
//! Start/stop (Ctrl-C), preset save/load, and device listing around the
//! capture engine. All user-facing status text flows through the telemetry
//! status sink.

use clap::Parser;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    ruskvader_telemetry::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Devices => commands::devices(),
        Commands::Run(args) => commands::run(args).await,
        Commands::Preset(command) => commands::preset(command),
    }
}

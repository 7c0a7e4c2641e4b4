use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use ruskvader_capture::{LiveSink, LiveSource};
use ruskvader_config::{lenient, Preset};
use ruskvader_core::{ImpairmentConfig, SharedConfig};
use ruskvader_engine::{CaptureSession, SessionOptions, DEFAULT_MAX_IN_FLIGHT};
use ruskvader_telemetry::logging;

type CliError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List interfaces available for capture
    Devices,
    /// Capture, impair, and reinject traffic on an interface
    Run(RunArgs),
    /// Save or inspect impairment presets
    #[command(subcommand)]
    Preset(PresetCommand),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Interface to capture on (see `devices`)
    #[arg(short, long)]
    pub interface: String,

    /// Preset file applied before any explicit flag
    #[arg(long)]
    pub preset: Option<PathBuf>,

    #[command(flatten)]
    pub impairments: ImpairmentArgs,

    /// Seed for the impairment RNG, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bound on concurrently in-flight packets
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub max_in_flight: usize,
}

/// Numeric fields arrive as raw text: malformed content degrades to 0 for
/// that field instead of failing the command.
#[derive(Args, Debug, Clone)]
pub struct ImpairmentArgs {
    /// Drop chance in percent; enables the drop stage
    #[arg(long)]
    pub drop: Option<String>,

    /// Base delay in milliseconds; enables the delay stage
    #[arg(long)]
    pub delay: Option<String>,

    /// Jitter magnitude in milliseconds; enables jitter on top of delay
    #[arg(long)]
    pub jitter: Option<String>,

    /// Duplicate chance in percent; enables the duplicate stage
    #[arg(long)]
    pub duplicate: Option<String>,

    /// Throughput budget in kbit/s; enables the throttle stage
    #[arg(long)]
    pub throttle: Option<String>,
}

impl ImpairmentArgs {
    /// Folds the flags into `config`: presence enables a stage, the value
    /// goes through the lenient parser.
    fn apply_to(&self, config: &mut ImpairmentConfig) {
        if let Some(text) = &self.drop {
            config.drop_enabled = true;
            config.drop_percent = lenient::percent(text);
        }
        if let Some(text) = &self.delay {
            config.delay_enabled = true;
            config.delay_ms = lenient::number(text);
        }
        if let Some(text) = &self.jitter {
            config.jitter_enabled = true;
            config.jitter_ms = lenient::number(text);
        }
        if let Some(text) = &self.duplicate {
            config.duplicate_enabled = true;
            config.duplicate_percent = lenient::percent(text);
        }
        if let Some(text) = &self.throttle {
            config.throttle_enabled = true;
            config.throttle_kbps = lenient::number(text);
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum PresetCommand {
    /// Write the given impairment flags as a preset file
    Save {
        path: PathBuf,
        #[command(flatten)]
        impairments: ImpairmentArgs,
    },
    /// Print the contents of a preset file
    Show { path: PathBuf },
}

pub fn devices() -> Result<(), CliError> {
    let devices = ruskvader_capture::list_devices()?;
    if devices.is_empty() {
        logging::status("No devices found");
        return Ok(());
    }
    for device in devices {
        match device.description {
            Some(description) => println!("{} - {}", device.name, description),
            None => println!("{}", device.name),
        }
    }
    Ok(())
}

pub async fn run(args: RunArgs) -> Result<(), CliError> {
    let mut config = ImpairmentConfig::default();

    if let Some(path) = &args.preset {
        let preset = Preset::load(path).map_err(|e| {
            logging::status(&format!("Error loading preset: {e}"));
            e
        })?;
        preset.apply_to(&mut config);
        logging::status(&format!("Preset loaded from {}", path.display()));
    }
    args.impairments.apply_to(&mut config);

    let sink = Arc::new(LiveSink::open(&args.interface).map_err(|e| {
        logging::status(&format!("Error opening device: {e}"));
        e
    })?);

    let interface = args.interface.clone();
    let mut session = CaptureSession::start(
        move || LiveSource::open(&interface),
        sink,
        SharedConfig::new(config),
        SessionOptions {
            seed: args.seed,
            max_in_flight: args.max_in_flight,
        },
    )?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        outcome = session.wait() => {
            // Fatal capture error; already reported through the status sink.
            outcome?;
            return Ok(());
        }
    }

    session.stop().await?;
    Ok(())
}

pub fn preset(command: PresetCommand) -> Result<(), CliError> {
    match command {
        PresetCommand::Save { path, impairments } => {
            let mut config = ImpairmentConfig::default();
            impairments.apply_to(&mut config);
            Preset::from(&config).save(&path).map_err(|e| {
                logging::status(&format!("Error saving preset: {e}"));
                e
            })?;
            logging::status(&format!("Preset saved to {}", path.display()));
            Ok(())
        }
        PresetCommand::Show { path } => {
            let preset = Preset::load(&path)?;
            println!("{preset:#?}");
            Ok(())
        }
    }
}

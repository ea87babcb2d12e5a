//! # locmoded: location-mode package generator
//!
//! Composition root that wires the Home Assistant adapters into the apply
//! service and exposes it as a command-line tool.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize `tracing` from the configured filter
//! - Construct the filesystem adapters and the apply service
//! - Run the requested command and report errors with their full cause chain
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use locmode_adapter_ha_package::{HaConfigDir, JsonPreferenceStore, YamlPackageWriter};
use locmode_app::preferences::Preferences;
use locmode_app::services::apply_service::ApplyService;
use locmode_domain::error::LocModeError;

use config::Config;

/// Generate the Home Assistant package that drives the location mode and
/// its lighting.
#[derive(Parser, Debug)]
#[command(name = "locmoded", version, about, long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(
        short,
        long,
        global = true,
        env = "LOCMODE_CONFIG",
        default_value = "locmode.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the host, compile and write the package (default command).
    Apply,
    /// Print the compiled package without writing it.
    Preview,
    /// Check that Home Assistant loads packages.
    Check,
    /// Validate a preference document and save it as the user preferences.
    Configure {
        /// JSON file with the preferences to save.
        file: PathBuf,
    },
    /// Print the mode a tracker value classifies to.
    Classify {
        /// Tracker state, e.g. `zone.office` or `home`.
        value: String,
    },
}

type Service = ApplyService<JsonPreferenceStore, HaConfigDir, YamlPackageWriter>;

fn build_service(config: &Config) -> Service {
    let options = config
        .addon_options
        .as_deref()
        .map(Preferences::from_options_json)
        .unwrap_or_default();
    ApplyService::new(
        JsonPreferenceStore::new(&config.paths.data_dir),
        HaConfigDir::new(&config.paths.config_dir),
        YamlPackageWriter::new(&config.paths.config_dir),
        config.output.variant,
    )
    .with_options(options)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter `{filter}` ({err}), falling back to `info`");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, service: &Service) -> anyhow::Result<()> {
    match command {
        Command::Apply => {
            let outcome = service.apply().await?;
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            println!("{outcome}");
        }
        Command::Preview => {
            let rendered = service.preview().await?;
            for warning in &rendered.warnings {
                eprintln!("warning: {warning}");
            }
            print!("{}", rendered.content);
        }
        Command::Check => {
            service.check().await?;
            println!("Home Assistant packages are enabled.");
        }
        Command::Configure { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let preferences: Preferences = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a valid preference document", file.display()))?;
            for warning in service.configure(preferences).await? {
                eprintln!("warning: {warning}");
            }
            println!("Preferences saved.");
        }
        Command::Classify { value } => {
            println!("{}", service.classify(&value).await?);
        }
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    eprintln!("error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    if let Some(LocModeError::MissingPrecondition(precondition)) =
        err.downcast_ref::<LocModeError>()
    {
        eprintln!("hint: {}", precondition.remediation());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            report(&anyhow::Error::new(err).context(format!(
                "failed to load configuration from {}",
                cli.config.display()
            )));
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging.filter);
    tracing::debug!(?config, "configuration loaded");

    let service = build_service(&config);
    match run(cli.command.unwrap_or(Command::Apply), &service).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

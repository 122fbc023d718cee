//! Coughscan - batch cough detection for audio recordings
//!
//! Entry point: parses arguments, sets up logging, loads configuration and
//! dispatches to the batch driver or one of the helper commands.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use coughscan::cli::{Args, Commands};
use coughscan::config::{Config, Environment, PayloadCheck, StrategyKind};
use coughscan::driver::{Driver, DriverOptions};
use coughscan::error::CoughScanError;
use coughscan::inference::OmniChatClient;
use coughscan::strategy::StrategyFactory;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("coughscan.toml").exists() {
                info!("Found coughscan.toml in current directory, loading...");
                Config::from_file("coughscan.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Detect { input_dir, output, strategy, environment, delay_ms, payload_check, skip_check } => {
            if let Some(strategy) = strategy {
                config.run.strategy = parse_strategy_kind(&strategy)?;
            }
            if let Some(environment) = environment {
                config.run.environment = parse_environment(&environment)?;
            }
            if let Some(delay_ms) = delay_ms {
                config.run.request_delay_ms = delay_ms;
            }
            if let Some(check) = payload_check {
                config.run.payload_check = parse_payload_check(&check)?;
            }

            let strategy = StrategyFactory::create_strategy(config.run.strategy, config.run.environment);
            let output = output
                .or_else(|| config.run.output_file.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(strategy.default_output_file()));

            info!("Detecting coughs under {} with strategy {}", input_dir.display(), strategy.name());

            let client = OmniChatClient::new(config.service.clone())?;
            if !skip_check {
                if let Err(e) = client.check_availability().await {
                    warn!("Service check failed, continuing anyway: {}", e);
                }
            }

            let mut options = DriverOptions::from_config(&config.run);
            options.show_progress = true;

            let driver = Driver::new(Box::new(client), strategy, options);

            let stop = driver.stop_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, finishing the current file");
                    stop.store(true, Ordering::SeqCst);
                }
            });

            let summary = driver.run(&input_dir, &output).await?;

            println!("\nCough detection {}", if summary.interrupted { "interrupted" } else { "completed" });
            println!("{:<20} {}", "Files found:", summary.discovered);
            println!("{:<20} {}", "Cough present:", summary.stats.positive);
            println!("{:<20} {}", "Cough absent:", summary.stats.negative);
            println!("{:<20} {}", "Failed:", summary.stats.errors);
            println!("{:<20} {}", "Results:", summary.output.display());
        }
        Commands::Strategies => {
            println!("\nAvailable Strategies:");
            println!("{:<20} {:<10} {:<12} {:<30}", "Name", "Kind", "Environment", "Default Output");
            println!("{}", "-".repeat(72));

            for strategy in StrategyFactory::all() {
                println!("{:<20} {:<10} {:<12} {:<30}",
                    strategy.name(),
                    strategy.kind().as_str(),
                    strategy.environment().as_str(),
                    strategy.default_output_file()
                );
            }
        }
        Commands::Prompt { strategy, environment } => {
            let kind = parse_strategy_kind(&strategy)?;
            let environment = parse_environment(&environment)?;
            let strategy = StrategyFactory::create_strategy(kind, environment);
            println!("{}", strategy.instruction());
        }
        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                return Err(CoughScanError::Config(format!(
                    "{} already exists; pass --force to overwrite",
                    output.display()
                )).into());
            }
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".coughscan").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "coughscan.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("coughscan.log").display());

    Ok(())
}

/// Parse strategy kind from string
fn parse_strategy_kind(kind: &str) -> Result<StrategyKind> {
    match kind.to_lowercase().replace('_', "-").as_str() {
        "direct" => Ok(StrategyKind::Direct),
        "cot" | "chain-of-thought" => Ok(StrategyKind::Cot),
        "self-ask" | "selfask" => Ok(StrategyKind::SelfAsk),
        "tot" | "tree-of-thoughts" => Ok(StrategyKind::Tot),
        _ => Err(CoughScanError::Config(format!(
            "Invalid strategy '{}'. Valid strategies: direct, cot, self-ask, tot",
            kind
        )).into()),
    }
}

/// Parse recording environment from string
fn parse_environment(environment: &str) -> Result<Environment> {
    match environment.to_lowercase().as_str() {
        "standard" => Ok(Environment::Standard),
        "quiet" => Ok(Environment::Quiet),
        "noisy" => Ok(Environment::Noisy),
        _ => Err(CoughScanError::Config(format!(
            "Invalid environment '{}'. Valid environments: standard, quiet, noisy",
            environment
        )).into()),
    }
}

/// Parse payload check mode from string
fn parse_payload_check(check: &str) -> Result<PayloadCheck> {
    match check.to_lowercase().as_str() {
        "round-trip" | "roundtrip" => Ok(PayloadCheck::RoundTrip),
        "syntax" => Ok(PayloadCheck::Syntax),
        _ => Err(CoughScanError::Config(format!(
            "Invalid payload check '{}'. Valid checks: round-trip, syntax",
            check
        )).into()),
    }
}

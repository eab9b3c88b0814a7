use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faveicon_core::{validate_duration, AppConfig};

mod commands;

#[derive(Parser)]
#[command(name = "faveicon")]
#[command(author, version, about = "Inspect and preview the elastic favorite icon animation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated scale keyframes
    Tween {
        /// Start value
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        from: f64,
        /// End value
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        to: f64,
        /// Duration in seconds (defaults to the configured duration)
        #[arg(short = 'd', long)]
        duration: Option<f64>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Play the animation in the terminal (default)
    Preview {
        /// Duration in seconds
        #[arg(short = 'd', long)]
        duration: Option<f64>,
        /// Selection delay in seconds
        #[arg(long)]
        delay: Option<f64>,
    },
    /// Show the configuration file path and effective settings
    Config {
        /// Write the defaults to the configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Initialize logging; stderr keeps stdout clean for `tween` output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::debug!(path = %AppConfig::config_path().display(), "Configuration loaded");

    match cli.command {
        Some(Commands::Tween {
            from,
            to,
            duration,
            json,
        }) => {
            let duration = validate_duration(duration.unwrap_or(config.animation.duration_secs))?;
            commands::tween::run(from, to, duration, json)
        }
        Some(Commands::Preview { duration, delay }) => {
            if let Some(duration) = duration {
                config.animation.duration_secs = validate_duration(duration)?;
            }
            if let Some(delay) = delay {
                config.animation.delay_secs = delay;
            }
            commands::preview::run(config)
        }
        None => commands::preview::run(config),
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}

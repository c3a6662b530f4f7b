//! autogoal: run an autonomous agent toward a goal from the terminal
//!
//! The agent breaks the goal into tasks, executes them one at a time with a
//! language model, and plans follow-up tasks until it is done.

mod commands;
mod config;
mod progress;
mod render;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Overrides;
use crate::render::OutputMode;

#[derive(Debug, Parser)]
#[command(name = "autogoal")]
#[command(about = "Autonomous goal-driven agent", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run an agent toward a goal
    Run {
        /// The goal to pursue
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,

        /// Model to use (overrides config)
        #[arg(short, long, env = "AUTOGOAL_MODEL")]
        model: Option<String>,

        /// Own provider API key; enables direct calls and the larger loop budget
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Chat-completions base URL for direct calls
        #[arg(long)]
        provider_url: Option<String>,

        /// Backend base URL for proxied calls
        #[arg(long, env = "AUTOGOAL_PROXY_URL")]
        proxy_url: Option<String>,

        /// Emit events without pacing delays
        #[arg(long)]
        no_pacing: bool,

        /// Print one JSON object per event
        #[arg(long)]
        json: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init,
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with rendered events
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            goal,
            model,
            api_key,
            temperature,
            provider_url,
            proxy_url,
            no_pacing,
            json,
        } => {
            let overrides = Overrides {
                model,
                api_key,
                temperature,
                provider_url,
                proxy_url,
                no_pacing,
            };
            let mode = if json {
                OutputMode::Json
            } else {
                OutputMode::Pretty
            };
            commands::run(&goal.join(" "), overrides, mode).await
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Init => commands::config_init()?,
                ConfigAction::Show => commands::config_show()?,
                ConfigAction::Path => commands::config_path()?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

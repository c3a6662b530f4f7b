//! Command implementations

use std::process::ExitCode;

use anyhow::{Context, Result};
use autogoal_core::{Agent, AgentHandle, ShutdownCallback, Strategy, Termination};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::{Overrides, UserConfig};
use crate::render::{self, OutputMode};

const YELLOW: &str = "\x1b[93m";
const RESET: &str = "\x1b[0m";

/// Exit status after a second Ctrl-C (128 + SIGINT)
const INTERRUPTED_EXIT: i32 = 130;

/// Run an agent toward `goal` until it shuts down
pub async fn run(goal: &str, overrides: Overrides, mode: OutputMode) -> Result<ExitCode> {
    let goal = goal.trim();
    if goal.is_empty() {
        anyhow::bail!("A goal is required");
    }

    let config = UserConfig::load()?;
    let settings = config.model_settings(&overrides);
    let endpoints = config.endpoints(&overrides);
    let options = config.agent_options(&overrides);
    info!(
        strategy = %Strategy::for_settings(&settings),
        model = %settings.model_name,
        "Launching agent"
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let agent = Agent::connect(
        goal,
        settings,
        &endpoints,
        event_tx,
        ShutdownCallback::notify(shutdown_tx),
        options,
    )?;

    let handle = agent.handle();
    let renderer = tokio::spawn(render::render(event_rx, mode));
    let agent_task = tokio::spawn(agent.run());

    let interrupt = tokio::spawn(watch_interrupts(handle));

    let termination = agent_task.await.context("Agent task failed")?;
    shutdown_rx
        .await
        .context("Agent exited without signaling shutdown")?;
    interrupt.abort();
    renderer.await.context("Renderer task failed")?;

    debug!(%termination, "Agent finished");
    Ok(ExitCode::from(exit_status(termination)))
}

/// First Ctrl-C stops the agent cooperatively, the second exits at once
async fn watch_interrupts(handle: AgentHandle) {
    let mut presses = 0u32;
    while tokio::signal::ctrl_c().await.is_ok() {
        presses += 1;
        if interrupt_action(presses) == InterruptAction::Exit {
            eprintln!("{}Interrupted{}", YELLOW, RESET);
            std::process::exit(INTERRUPTED_EXIT);
        }
        handle.stop();
        eprintln!(
            "{}Stopping after the current task finishes (Ctrl-C again to exit now)...{}",
            YELLOW, RESET
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    Stop,
    Exit,
}

fn interrupt_action(presses: u32) -> InterruptAction {
    if presses > 1 {
        InterruptAction::Exit
    } else {
        InterruptAction::Stop
    }
}

fn exit_status(termination: Termination) -> u8 {
    if !termination.is_error() {
        return 0;
    }
    match termination {
        Termination::LoopLimit => 2,
        _ => 1,
    }
}

/// Write a default config file
pub fn config_init() -> Result<()> {
    let path = UserConfig::create_default()?;
    println!("Created {}", path.display());
    Ok(())
}

/// Print the effective config with the credential masked
pub fn config_show() -> Result<()> {
    let config = UserConfig::load()?;
    let content =
        toml::to_string_pretty(&config.redacted()).context("Failed to serialize config")?;
    print!("{}", content);
    Ok(())
}

pub fn config_path() -> Result<()> {
    println!("{}", UserConfig::config_path()?.display());
    Ok(())
}

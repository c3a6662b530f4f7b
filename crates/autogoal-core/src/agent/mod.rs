//! Autonomous agent
//!
//! Decomposes a goal into tasks, executes them one at a time, and
//! re-plans after each until the queue drains, the iteration cap is hit,
//! or the host stops it.

mod agent_loop;
mod state;

pub use agent_loop::Agent;
pub use state::{AgentState, Termination};

//! autogoal-core: goal-driven autonomous task loop
//!
//! Provides:
//! - The agent loop (decompose, execute, re-plan, terminate)
//! - Task queue and completion history
//! - Lifecycle events and stop/shutdown signaling
//! - Model call gateway with direct and proxied strategies

pub mod agent;
pub mod config;
pub mod events;
pub mod gateway;
pub mod lifecycle;
pub mod messages;
pub mod openai;
pub mod queue;

pub use agent::{Agent, AgentState, Termination};
pub use config::{AgentOptions, Endpoints, LoopLimits, ModelSettings, Pacing};
pub use events::{AgentEvent, EventEmitter, EventKind, EventRecord, EventSink};
pub use gateway::{ModelGateway, PlanRequest, Strategy};
pub use lifecycle::{AgentHandle, ShutdownCallback};
pub use queue::TaskQueue;

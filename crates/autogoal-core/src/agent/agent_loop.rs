//! Agent loop implementation

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{debug, info, instrument, warn};

use crate::config::{AgentOptions, Endpoints, ModelSettings};
use crate::events::{EventEmitter, EventSink};
use crate::gateway::{self, ModelGateway, PlanRequest};
use crate::lifecycle::{AgentHandle, ShutdownCallback};
use crate::messages::{self, MessageKind};
use crate::queue::TaskQueue;

use super::state::{AgentState, Termination};

/// The agent loop orchestrator
///
/// Owns its state, queue and history exclusively. `run` consumes the
/// agent, so each instance runs once.
pub struct Agent {
    state: AgentState,
    queue: TaskQueue,
    settings: ModelSettings,
    options: AgentOptions,
    gateway: Arc<dyn ModelGateway>,
    events: EventEmitter,
    shutdown: ShutdownCallback,
    handle: AgentHandle,
}

impl Agent {
    /// Create an agent around an existing gateway
    pub fn new(
        goal: impl Into<String>,
        settings: ModelSettings,
        gateway: Arc<dyn ModelGateway>,
        sink: impl EventSink + 'static,
        shutdown: ShutdownCallback,
        options: AgentOptions,
    ) -> Self {
        Self {
            state: AgentState::new(goal),
            queue: TaskQueue::new(),
            settings,
            options,
            gateway,
            events: EventEmitter::new(sink),
            shutdown,
            handle: AgentHandle::new(),
        }
    }

    /// Create an agent with the gateway its settings call for
    pub fn connect(
        goal: impl Into<String>,
        settings: ModelSettings,
        endpoints: &Endpoints,
        sink: impl EventSink + 'static,
        shutdown: ShutdownCallback,
        options: AgentOptions,
    ) -> Result<Self> {
        let gateway = gateway::connect(&settings, endpoints, options.call_timeout)?;
        Ok(Self::new(goal, settings, gateway, sink, shutdown, options))
    }

    /// Handle for stopping the agent from outside the loop
    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Run until a terminal state, invoking the shutdown callback once
    #[instrument(skip(self), fields(model = %self.settings.model_name))]
    pub async fn run(mut self) -> Termination {
        let cap = self
            .options
            .loop_limits
            .cap_for(self.settings.has_custom_credential());
        info!(goal_len = self.state.goal.len(), cap, "Starting agent");

        self.events.goal(&self.state.goal);
        self.events.thinking();

        let initial = self
            .call(self.gateway.decompose_goal(&self.state.goal))
            .await;
        match initial {
            Ok(tasks) => {
                debug!(tasks = tasks.len(), "Initial tasks");
                self.enqueue(tasks).await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve initial tasks");
                return self.terminate(Termination::StartError);
            }
        }

        loop {
            if !self.handle.is_running() {
                return self.terminate(Termination::ManualStop);
            }

            if self.queue.is_empty() {
                return self.terminate(Termination::Completed);
            }

            let loop_count = self.state.increment_loop();
            debug!(
                loop_count,
                pending = self.queue.pending_len(),
                completed = self.queue.completed().len(),
                "Starting iteration"
            );
            if loop_count > cap {
                warn!(cap, "Agent reached maximum iterations");
                return self.terminate(Termination::LoopLimit);
            }

            pace(self.options.pacing.iteration_delay).await;

            let Some(task) = self.queue.dequeue() else {
                return self.terminate(Termination::Completed);
            };
            self.events.thinking();

            if let Err(e) = self.work_on(&task).await {
                warn!(task = %task, error = %e, "Iteration failed; continuing");
                self.events
                    .system(self.message(MessageKind::IterationError));
                self.events.action(messages::TASK_COMPLETE_AFTER_ERROR);
            }
        }
    }

    /// Execute `task`, then re-plan. Any failure aborts the whole unit.
    async fn work_on(&mut self, task: &str) -> Result<()> {
        let result = self
            .call(self.gateway.execute_task(&self.state.goal, task))
            .await?;
        self.events.execution(task, &result);

        pace(self.options.pacing.iteration_delay).await;
        self.events.thinking();

        let pending = self.queue.pending();
        let request = PlanRequest {
            goal: &self.state.goal,
            pending: &pending,
            last_task: task,
            last_result: &result,
            completed: self.queue.completed(),
        };
        let new_tasks = self.call(self.gateway.plan_next_tasks(request)).await?;
        debug!(task = %task, new_tasks = new_tasks.len(), "Re-planned");

        if new_tasks.is_empty() {
            self.events.action(messages::TASK_COMPLETE);
        } else {
            self.enqueue(new_tasks).await;
        }
        Ok(())
    }

    /// Append tasks to the queue and announce each one
    async fn enqueue(&mut self, tasks: Vec<String>) {
        self.queue.extend(tasks.iter().cloned());
        for task in &tasks {
            pace(self.options.pacing.task_delay).await;
            self.events.task(task);
        }
    }

    /// Await a gateway call, bounded by the configured timeout
    async fn call<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.options.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => bail!("Model call timed out after {:?}", limit),
            },
            None => fut.await,
        }
    }

    fn message(&self, kind: MessageKind) -> &'static str {
        messages::message(kind, self.settings.has_custom_credential())
    }

    fn terminate(self, termination: Termination) -> Termination {
        self.events.system(self.message(termination.message_kind()));
        self.shutdown.invoke();
        info!(
            %termination,
            loops = self.state.loop_count,
            completed = self.queue.completed().len(),
            pending = self.queue.pending_len(),
            "Agent shut down"
        );
        termination
    }
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

//! Lifecycle of the single background game run: submit, poll, finish.

use std::sync::Arc;
use std::time::Duration;

use gateway::{Backend, RequestError};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use types::{RecordId, TaskId, TaskStatus};

use crate::error::DashboardError;
use crate::message::{Message, TaskMessage};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3500);
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Give up on a run still reporting `running` after this long.
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: Some(DEFAULT_MAX_WAIT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPhase {
    Idle,
    Submitting,
    Polling { task_id: TaskId },
}

#[derive(Debug)]
pub enum TaskOutcome {
    Started(TaskId),
    Finished {
        task_id: TaskId,
        record_id: Option<RecordId>,
    },
    Failed(DashboardError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("a game run is already in progress")]
pub struct SupervisorBusy;

pub struct TaskSupervisor {
    backend: Arc<dyn Backend>,
    tx: UnboundedSender<Message>,
    policy: PollPolicy,
    phase: TaskPhase,
    timer: Option<AbortHandle>,
    // Bumped on every cancel so replies and ticks of an abandoned run are
    // recognisable.
    generation: u64,
    polling_since: Option<Instant>,
    polls: u32,
}

impl TaskSupervisor {
    pub(crate) fn new(
        backend: Arc<dyn Backend>,
        tx: UnboundedSender<Message>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            backend,
            tx,
            policy,
            phase: TaskPhase::Idle,
            timer: None,
            generation: 0,
            polling_since: None,
            polls: 0,
        }
    }

    pub fn phase(&self) -> &TaskPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TaskPhase::Idle
    }

    pub fn has_scheduled_poll(&self) -> bool {
        self.timer.is_some()
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Callers are expected to keep the trigger disabled while a run is in
    /// progress; this only refuses, it never queues.
    pub fn submit(&mut self) -> Result<(), SupervisorBusy> {
        if !self.is_idle() {
            return Err(SupervisorBusy);
        }
        self.phase = TaskPhase::Submitting;
        self.polls = 0;

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = backend.start_game().await;
            let _ = tx.send(Message::Task(TaskMessage::Submitted { generation, result }));
        });
        Ok(())
    }

    pub(crate) fn handle(&mut self, message: TaskMessage) -> Option<TaskOutcome> {
        match message {
            TaskMessage::Submitted { generation, result } => {
                if !self.is_current(generation) || self.phase != TaskPhase::Submitting {
                    log::debug!("Ignoring submission reply from an abandoned run");
                    return None;
                }
                self.on_submitted(result)
            }
            TaskMessage::Tick { generation } => {
                if self.is_current(generation) {
                    self.on_tick();
                } else {
                    log::debug!("Ignoring late poll tick");
                }
                None
            }
            TaskMessage::Status { generation, result } => {
                if !self.is_current(generation) {
                    log::debug!("Ignoring status reply from an abandoned run");
                    return None;
                }
                self.on_status(result)
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation += 1;
        self.phase = TaskPhase::Idle;
        self.polling_since = None;
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    fn on_submitted(&mut self, result: Result<TaskId, RequestError>) -> Option<TaskOutcome> {
        match result {
            Ok(task_id) => {
                log::info!("Game run {task_id} started, polling every {:?}", self.policy.interval);
                self.phase = TaskPhase::Polling {
                    task_id: task_id.clone(),
                };
                self.polling_since = Some(Instant::now());
                self.schedule_tick();
                Some(TaskOutcome::Started(task_id))
            }
            Err(e) => {
                log::warn!("Game run submission failed: {e}");
                self.cancel();
                Some(TaskOutcome::Failed(DashboardError::Submission(e)))
            }
        }
    }

    fn on_tick(&mut self) {
        let TaskPhase::Polling { task_id } = &self.phase else {
            return;
        };
        // The timer that sent this tick has already fired.
        self.timer = None;
        self.polls += 1;

        let task_id = task_id.clone();
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = backend.task_status(&task_id).await;
            let _ = tx.send(Message::Task(TaskMessage::Status { generation, result }));
        });
    }

    fn on_status(&mut self, result: Result<TaskStatus, RequestError>) -> Option<TaskOutcome> {
        let TaskPhase::Polling { task_id } = &self.phase else {
            return None;
        };
        let task_id = task_id.clone();

        match result {
            Ok(TaskStatus::Running) | Ok(TaskStatus::Unknown) => {
                if let (Some(limit), Some(since)) = (self.policy.max_wait, self.polling_since) {
                    if since.elapsed() >= limit {
                        log::warn!("Game run {task_id} still running after {limit:?}, giving up");
                        self.cancel();
                        return Some(TaskOutcome::Failed(DashboardError::TaskTimedOut(limit)));
                    }
                }
                log::debug!("Game run {task_id} still running after {} polls", self.polls);
                self.schedule_tick();
                None
            }
            Ok(TaskStatus::Finished { record_id }) => {
                self.cancel();
                log::info!("Game run {task_id} finished with record {record_id:?}");
                Some(TaskOutcome::Finished { task_id, record_id })
            }
            Ok(TaskStatus::Failed { error }) => {
                self.cancel();
                log::warn!("Game run {task_id} failed: {error}");
                Some(TaskOutcome::Failed(DashboardError::TaskFailure(error)))
            }
            Err(e) => {
                self.cancel();
                log::warn!("Polling game run {task_id} failed: {e}");
                Some(TaskOutcome::Failed(DashboardError::PollError(e)))
            }
        }
    }

    fn schedule_tick(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        let tx = self.tx.clone();
        let generation = self.generation;
        let interval = self.policy.interval;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = tx.send(Message::Task(TaskMessage::Tick { generation }));
        });
        self.timer = Some(handle.abort_handle());
    }
}

impl Drop for TaskSupervisor {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::json;
use types::{RecordDetail, RecordId, RecordsPage, TaskId, TaskStatus};

use super::Backend;
use crate::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Transport(String),
    Status { status: u16, message: String },
}

impl Failure {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Failure::Status {
            status,
            message: message.into(),
        }
    }

    fn into_error(self) -> RequestError {
        match self {
            Failure::Transport(reason) => RequestError::Transport(reason),
            Failure::Status { status, message } => RequestError::Status {
                status,
                body: Some(json!({ "error": message })),
                message,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Step<T> {
    result: Result<T, Failure>,
    delay: Duration,
}

impl<T> Step<T> {
    fn now(result: Result<T, Failure>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
        }
    }
}

/// Queue whose last entry keeps answering once the others are used up.
/// Pushing after that entry has answered replaces it.
#[derive(Debug)]
struct Replies<T> {
    queue: VecDeque<Step<T>>,
    served: bool,
}

impl<T: Clone> Replies<T> {
    fn push(&mut self, step: Step<T>) {
        if self.served && self.queue.len() == 1 {
            self.queue.clear();
        }
        self.served = false;
        self.queue.push_back(step);
    }

    fn next(&mut self) -> Option<Step<T>> {
        if self.queue.len() > 1 {
            self.served = false;
            self.queue.pop_front()
        } else {
            self.served = !self.queue.is_empty();
            self.queue.front().cloned()
        }
    }
}

impl<T> Default for Replies<T> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            served: false,
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    records: Replies<RecordsPage>,
    details: HashMap<RecordId, Step<RecordDetail>>,
    starts: Replies<TaskId>,
    statuses: Replies<TaskStatus>,
    calls: CallLog,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub list_records: usize,
    pub record_detail: Vec<RecordId>,
    pub start_game: usize,
    pub task_status: Vec<TaskId>,
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_records(self, page: RecordsPage) -> Self {
        self.push_records(Ok(page));
        self
    }

    pub fn with_records_failure(self, failure: Failure) -> Self {
        self.push_records(Err(failure));
        self
    }

    pub fn with_detail(self, id: impl Into<RecordId>, detail: RecordDetail) -> Self {
        self.set_detail(id.into(), Ok(detail), Duration::ZERO);
        self
    }

    pub fn with_delayed_detail(
        self,
        id: impl Into<RecordId>,
        detail: RecordDetail,
        delay: Duration,
    ) -> Self {
        self.set_detail(id.into(), Ok(detail), delay);
        self
    }

    pub fn with_detail_failure(self, id: impl Into<RecordId>, failure: Failure) -> Self {
        self.set_detail(id.into(), Err(failure), Duration::ZERO);
        self
    }

    pub fn with_task(self, task_id: impl Into<TaskId>) -> Self {
        self.script().starts.push(Step::now(Ok(task_id.into())));
        self
    }

    pub fn with_start_failure(self, failure: Failure) -> Self {
        self.script().starts.push(Step::now(Err(failure)));
        self
    }

    pub fn with_status(self, status: TaskStatus) -> Self {
        self.push_status(Ok(status));
        self
    }

    pub fn with_status_failure(self, failure: Failure) -> Self {
        self.push_status(Err(failure));
        self
    }

    pub fn push_records(&self, result: Result<RecordsPage, Failure>) {
        self.script().records.push(Step::now(result));
    }

    pub fn push_status(&self, result: Result<TaskStatus, Failure>) {
        self.script().statuses.push(Step::now(result));
    }

    pub fn set_detail(&self, id: RecordId, result: Result<RecordDetail, Failure>, delay: Duration) {
        self.script().details.insert(id, Step { result, delay });
    }

    pub fn calls(&self) -> CallLog {
        self.script().calls.clone()
    }

    async fn answer<T>(step: Option<Step<T>>, route: &str) -> Result<T, RequestError> {
        let Some(step) = step else {
            return Err(RequestError::Transport(format!("no scripted reply for {route}")));
        };
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.result.map_err(Failure::into_error)
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn list_records(&self) -> Result<RecordsPage, RequestError> {
        let step = {
            let mut script = self.script();
            script.calls.list_records += 1;
            script.records.next()
        };
        Self::answer(step, "GET /api/records").await
    }

    async fn record_detail(&self, id: &RecordId) -> Result<RecordDetail, RequestError> {
        let step = {
            let mut script = self.script();
            script.calls.record_detail.push(id.clone());
            script.details.get(id).cloned().unwrap_or_else(|| {
                Step::now(Err(Failure::status(404, "record not found")))
            })
        };
        Self::answer(Some(step), "GET /api/records/{id}").await
    }

    async fn start_game(&self) -> Result<TaskId, RequestError> {
        let step = {
            let mut script = self.script();
            script.calls.start_game += 1;
            script.starts.next()
        };
        Self::answer(step, "POST /api/games").await
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatus, RequestError> {
        let step = {
            let mut script = self.script();
            script.calls.task_status.push(task_id.clone());
            script.statuses.next()
        };
        Self::answer(step, "GET /api/games/{task_id}").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_status_repeats() {
        let backend = ScriptedBackend::new()
            .with_status(TaskStatus::Running)
            .with_status(TaskStatus::Finished { record_id: None });
        let task = TaskId::new("t");

        assert_eq!(backend.task_status(&task).await.unwrap(), TaskStatus::Running);
        for _ in 0..3 {
            assert_eq!(
                backend.task_status(&task).await.unwrap(),
                TaskStatus::Finished { record_id: None }
            );
        }
        assert_eq!(backend.calls().task_status.len(), 4);
    }

    #[tokio::test]
    async fn test_push_replaces_answered_reply() {
        let backend = ScriptedBackend::new().with_records(RecordsPage::default());
        assert!(backend.list_records().await.is_ok());

        backend.push_records(Err(Failure::Transport("down".to_string())));
        assert!(backend.list_records().await.unwrap_err().is_transport());
        assert!(backend.list_records().await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_push_keeps_unanswered_reply() {
        let backend = ScriptedBackend::new().with_records(RecordsPage::default());
        backend.push_records(Err(Failure::Transport("down".to_string())));

        assert!(backend.list_records().await.is_ok());
        assert!(backend.list_records().await.unwrap_err().is_transport());
    }

    #[tokio::test]
    async fn test_unknown_detail_is_not_found() {
        let backend = ScriptedBackend::new();
        let err = backend.record_detail(&RecordId::new("nope")).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "record not found");
    }

    #[tokio::test]
    async fn test_unscripted_route_is_a_transport_error() {
        let backend = ScriptedBackend::new();
        assert!(backend.list_records().await.unwrap_err().is_transport());
        assert_eq!(backend.calls().list_records, 1);
    }
}

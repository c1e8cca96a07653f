use serde::{Deserialize, Serialize};

use crate::ident::{RecordId, TaskId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartedTask {
    #[serde(default)]
    pub task_id: Option<TaskId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StatusKind {
    Running,
    Finished,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
struct RawTaskStatus {
    #[serde(default)]
    status: Option<StatusKind>,
    #[serde(default)]
    record_id: Option<RecordId>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTaskStatus")]
pub enum TaskStatus {
    Running,
    Finished { record_id: Option<RecordId> },
    Failed { error: String },
    /// The backend answered without a status we recognise.
    Unknown,
}

impl From<RawTaskStatus> for TaskStatus {
    fn from(raw: RawTaskStatus) -> Self {
        match raw.status {
            Some(StatusKind::Running) => TaskStatus::Running,
            Some(StatusKind::Finished) => TaskStatus::Finished {
                record_id: raw.record_id,
            },
            Some(StatusKind::Failed) => TaskStatus::Failed {
                error: raw.error.unwrap_or_else(|| "game run failed".to_string()),
            },
            Some(StatusKind::Unknown) | None => TaskStatus::Unknown,
        }
    }
}

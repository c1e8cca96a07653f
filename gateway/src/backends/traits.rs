use async_trait::async_trait;
use types::{RecordDetail, RecordId, RecordsPage, TaskId, TaskStatus};

use crate::RequestError;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_records(&self) -> Result<RecordsPage, RequestError>;
    async fn record_detail(&self, id: &RecordId) -> Result<RecordDetail, RequestError>;
    async fn start_game(&self) -> Result<TaskId, RequestError>;
    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatus, RequestError>;
}

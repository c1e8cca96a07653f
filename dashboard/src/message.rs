use gateway::RequestError;
use tokio::sync::mpsc::UnboundedSender;
use types::{RecordDetail, RecordId, RecordsPage, TaskId, TaskStatus};

/// Everything the controller reacts to, consumed in arrival order. Only user
/// actions can be sent from outside the crate, through `DashboardHandle`.
#[derive(Debug)]
pub(crate) enum Message {
    Refresh {
        preferred: Option<RecordId>,
        force: bool,
    },
    RecordsLoaded {
        seq: u64,
        preferred: Option<RecordId>,
        force: bool,
        result: Result<RecordsPage, RequestError>,
    },
    ActivateRecord(RecordId),
    DetailLoaded {
        seq: u64,
        record_id: RecordId,
        result: Result<RecordDetail, RequestError>,
    },
    StartGame,
    Task(TaskMessage),
    Shutdown,
}

#[derive(Debug)]
pub(crate) enum TaskMessage {
    Submitted {
        generation: u64,
        result: Result<TaskId, RequestError>,
    },
    Tick {
        generation: u64,
    },
    Status {
        generation: u64,
        result: Result<TaskStatus, RequestError>,
    },
}

#[derive(Debug, Clone)]
pub struct DashboardHandle {
    tx: UnboundedSender<Message>,
}

impl DashboardHandle {
    pub(crate) fn new(tx: UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    fn send(&self, message: Message) -> bool {
        self.tx.send(message).is_ok()
    }

    pub fn activate(&self, id: RecordId) -> bool {
        self.send(Message::ActivateRecord(id))
    }

    pub fn start_game(&self) -> bool {
        self.send(Message::StartGame)
    }

    pub fn refresh(&self) -> bool {
        self.send(Message::Refresh {
            preferred: None,
            force: false,
        })
    }

    pub fn shutdown(&self) -> bool {
        self.send(Message::Shutdown)
    }
}

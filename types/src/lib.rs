pub mod detail;
pub mod ident;
pub mod record;
pub mod task;
pub mod tri_state;

pub use detail::{PlayEvent, RecordDetail, Round, RoundResult};
pub use ident::{RecordId, TaskId};
pub use record::{RecordSummary, RecordsPage, Summary, WinnerCount};
pub use task::{StartedTask, TaskStatus};
pub use tri_state::TriState;

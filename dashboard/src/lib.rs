pub mod config;
pub mod controller;
pub mod error;
pub mod location;
pub mod message;
pub mod reconciler;
pub mod renderer;
pub mod state;
pub mod supervisor;
pub mod surface;

pub use config::{ConfigError, DashboardConfig, FileConfig};
pub use controller::Dashboard;
pub use error::{DashboardError, Toast, ToastLevel};
pub use location::Location;
pub use message::DashboardHandle;
pub use reconciler::{reconcile, Reconciliation, Selection, SelectionRequest};
pub use state::DashboardState;
pub use supervisor::{PollPolicy, SupervisorBusy, TaskOutcome, TaskPhase, TaskSupervisor};
pub use surface::{RecordingSurface, Surface, SurfaceEvent, TerminalSurface};

pub mod http_backend;
pub mod scripted_backend;
pub mod traits;

pub use http_backend::HttpBackend;
pub use scripted_backend::{CallLog, Failure, ScriptedBackend};
pub use traits::Backend;

pub mod backends;
pub mod config;
pub mod error;
pub mod request;
pub mod retry;

pub use backends::{Backend, CallLog, Failure, HttpBackend, ScriptedBackend};
pub use config::GatewayConfig;
pub use error::RequestError;
pub use request::{request, Endpoint, RequestOptions};
pub use retry::retry_with_backoff;

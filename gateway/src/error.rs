use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Response is missing `{0}`")]
    MissingField(&'static str),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e.to_string())
    }
}

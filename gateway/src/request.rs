use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use types::{RecordId, TaskId};
use url::Url;

use crate::RequestError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Records,
    Record(RecordId),
    Games,
    Game(TaskId),
}

impl Endpoint {
    pub fn url(&self, base: &Url) -> Result<Url, RequestError> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RequestError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty().push("api");
            match self {
                Endpoint::Records => {
                    segments.push("records");
                }
                Endpoint::Record(id) => {
                    segments.push("records").push(id.as_str());
                }
                Endpoint::Games => {
                    segments.push("games");
                }
                Endpoint::Game(task_id) => {
                    segments.push("games").push(task_id.as_str());
                }
            }
        }
        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
        }
    }

    pub fn post(body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            body,
        }
    }
}

pub async fn request(
    client: &Client,
    base: &Url,
    endpoint: &Endpoint,
    options: RequestOptions,
) -> Result<Value, RequestError> {
    let url = endpoint.url(base)?;
    tracing::debug!("{} {}", options.method, url);

    let mut builder = client.request(options.method, url);
    if let Some(body) = &options.body {
        builder = builder.json(body);
    }
    let response = builder.send().await?;
    let status = response.status();
    let text = response.text().await?;
    normalize_response(status, &text)
}

/// The body is parsed whatever the status. A failing status becomes a
/// `RequestError::Status` carrying the server's `error` string when it sent
/// one; a successful reply with no usable body becomes `{}`.
pub fn normalize_response(status: StatusCode, text: &str) -> Result<Value, RequestError> {
    let parsed = serde_json::from_str::<Value>(text)
        .ok()
        .filter(|value| !value.is_null());

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("request failed: {}", status.as_u16()));
        tracing::debug!("request failed with {}: {}", status, message);
        return Err(RequestError::Status {
            status: status.as_u16(),
            message,
            body: parsed,
        });
    }

    Ok(parsed.unwrap_or_else(|| Value::Object(Map::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_urls() {
        let base = Url::parse("http://localhost:8000/").unwrap();
        assert_eq!(
            Endpoint::Records.url(&base).unwrap().as_str(),
            "http://localhost:8000/api/records"
        );
        assert_eq!(
            Endpoint::Game(TaskId::new("t-1")).url(&base).unwrap().as_str(),
            "http://localhost:8000/api/games/t-1"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_escapes_ids() {
        let base = Url::parse("http://localhost:8000/liars-bar").unwrap();
        let url = Endpoint::Record(RecordId::new("a b/c")).url(&base).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/liars-bar/api/records/a%20b%2Fc"
        );
    }

    #[test]
    fn test_error_message_comes_from_body() {
        let err = normalize_response(StatusCode::NOT_FOUND, r#"{"error": "record missing"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "record missing");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&json!({"error": "record missing"})));
    }

    #[test]
    fn test_generic_message_without_error_field() {
        let err = normalize_response(StatusCode::BAD_GATEWAY, "<html>oops</html>").unwrap_err();
        assert_eq!(err.to_string(), "request failed: 502");
        assert_eq!(err.body(), None);
    }

    #[test]
    fn test_success_without_body_is_empty_object() {
        assert_eq!(normalize_response(StatusCode::OK, "").unwrap(), json!({}));
        assert_eq!(normalize_response(StatusCode::OK, "null").unwrap(), json!({}));
        assert_eq!(
            normalize_response(StatusCode::OK, "not json").unwrap(),
            json!({})
        );
        assert_eq!(
            normalize_response(StatusCode::OK, r#"{"task_id": "t"}"#).unwrap(),
            json!({"task_id": "t"})
        );
    }
}

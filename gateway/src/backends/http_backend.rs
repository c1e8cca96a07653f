use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use types::{RecordDetail, RecordId, RecordsPage, StartedTask, TaskId, TaskStatus};
use url::Url;

use super::Backend;
use crate::request::{request, Endpoint, RequestOptions};
use crate::{retry_with_backoff, GatewayConfig, RequestError};

pub struct HttpBackend {
    client: Client,
    base: Url,
    read_retries: usize,
    retry_delay: Duration,
}

impl HttpBackend {
    pub fn new(config: &GatewayConfig) -> Result<Self, RequestError> {
        let base = Url::parse(&config.base_url)?;
        let client = config.create_client()?;
        Ok(Self {
            client,
            base,
            read_retries: config.read_retries,
            retry_delay: config.retry_delay,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn read(&self, endpoint: Endpoint) -> Result<Value, RequestError> {
        let client = self.client.clone();
        let base = self.base.clone();
        retry_with_backoff(
            move || {
                let client = client.clone();
                let base = base.clone();
                let endpoint = endpoint.clone();
                Box::pin(async move {
                    request(&client, &base, &endpoint, RequestOptions::get()).await
                })
            },
            RequestError::is_transport,
            self.read_retries,
            self.retry_delay,
        )
        .await
    }

    async fn read_once(&self, endpoint: Endpoint) -> Result<Value, RequestError> {
        request(&self.client, &self.base, &endpoint, RequestOptions::get()).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RequestError> {
    Ok(serde_json::from_value(value)?)
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn list_records(&self) -> Result<RecordsPage, RequestError> {
        decode(self.read(Endpoint::Records).await?)
    }

    async fn record_detail(&self, id: &RecordId) -> Result<RecordDetail, RequestError> {
        decode(self.read(Endpoint::Record(id.clone())).await?)
    }

    async fn start_game(&self) -> Result<TaskId, RequestError> {
        let value = request(
            &self.client,
            &self.base,
            &Endpoint::Games,
            RequestOptions::post(None),
        )
        .await?;
        let started: StartedTask = decode(value)?;
        let task_id = started.task_id.ok_or(RequestError::MissingField("task_id"))?;
        tracing::info!("Backend accepted game run {}", task_id);
        Ok(task_id)
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<TaskStatus, RequestError> {
        decode(self.read_once(Endpoint::Game(task_id.clone())).await?)
    }
}

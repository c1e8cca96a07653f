use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub read_retries: usize,
    pub retry_delay: Duration,
}

impl GatewayConfig {
    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let base_url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var(API_URL_ENV) {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            DEFAULT_API_URL.to_string()
        };

        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn create_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            read_retries: 1,
            retry_delay: Duration::from_millis(250),
        }
    }
}

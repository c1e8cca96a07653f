use std::path::{Path, PathBuf};
use std::time::Duration;

use gateway::GatewayConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::supervisor::PollPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    /// `0` disables the limit.
    pub poll_max_wait_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub request_retries: Option<usize>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub gateway: GatewayConfig,
    pub poll: PollPolicy,
}

impl DashboardConfig {
    pub fn load(cli_api_url: Option<String>, path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_file_config(cli_api_url, file))
    }

    pub fn from_file_config(cli_api_url: Option<String>, file: FileConfig) -> Self {
        let mut gateway = GatewayConfig::from_cli_or_env_or_yaml(cli_api_url, file.api_url);
        if let Some(secs) = file.request_timeout_secs {
            gateway.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(retries) = file.request_retries {
            gateway.read_retries = retries;
        }

        let mut poll = PollPolicy::default();
        if let Some(ms) = file.poll_interval_ms {
            poll.interval = Duration::from_millis(ms);
        }
        if let Some(secs) = file.poll_max_wait_secs {
            poll.max_wait = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Self { gateway, poll }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_overrides_defaults() {
        let file: FileConfig = serde_yaml::from_str(
            "api_url: http://records.local:8000\npoll_interval_ms: 500\npoll_max_wait_secs: 0\nrequest_retries: 3\n",
        )
        .unwrap();
        let config = DashboardConfig::from_file_config(Some("http://cli:1".into()), file);

        assert_eq!(config.gateway.base_url, "http://cli:1");
        assert_eq!(config.gateway.read_retries, 3);
        assert_eq!(config.poll.interval, Duration::from_millis(500));
        assert_eq!(config.poll.max_wait, None);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = DashboardConfig::from_file_config(Some("http://cli:1".into()), FileConfig::default());
        assert_eq!(config.poll, PollPolicy::default());
        assert_eq!(config.poll.interval, Duration::from_millis(3500));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let parsed: Result<FileConfig, _> = serde_yaml::from_str("poll_every: 3\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = DashboardConfig::load(None, Some(Path::new("/nonexistent/dashboard.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

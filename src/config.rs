//! # Client Configuration
//!
//! Layered configuration for the job client: compiled defaults, an optional
//! TOML file, then `OPTIROUTE_*` environment variables (`__` separates the
//! section from the key, e.g. `OPTIROUTE_POLLING__POLL_INTERVAL_MS=500`).
//!
//! # Examples
//!
//! ```rust
//! use optiroute_client::config::ClientConfig;
//! use optiroute_client::models::RawJobStatus;
//!
//! let config = ClientConfig::default();
//! assert_eq!(config.polling.poll_interval_ms, 2000);
//! assert!(config.polling.is_terminal(RawJobStatus::Completed));
//! assert!(!config.polling.is_terminal(RawJobStatus::Processing));
//! ```

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::defaults;
use crate::error::{ClientError, ClientResult};
use crate::models::RawJobStatus;

const ENV_PREFIX: &str = "OPTIROUTE";

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub upload: UploadConfig,
}

/// Where the backend lives and how long a single HTTP request may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL for the API (e.g., "<http://localhost:8080>")
    pub base_url: String,
    pub upload_path: String,
    pub results_path: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            upload_path: defaults::UPLOAD_PATH.to_string(),
            results_path: defaults::RESULTS_PATH.to_string(),
            request_timeout_ms: defaults::REQUEST_TIMEOUT_MS,
        }
    }
}

/// Poll cadence and terminal-status classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between the end of one status query and the start of the next
    pub poll_interval_ms: u64,
    /// Statuses after which polling stops for good
    pub terminal_statuses: HashSet<RawJobStatus>,
    /// Upper bound on one status query; elapsing counts as a transport failure
    pub status_timeout_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            terminal_statuses: HashSet::from([RawJobStatus::Completed, RawJobStatus::Failed]),
            status_timeout_ms: defaults::STATUS_TIMEOUT_MS,
        }
    }
}

impl PollingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    /// `COMPLETED` and `FAILED` end polling whatever the configured set says
    pub fn is_terminal(&self, status: RawJobStatus) -> bool {
        status.is_terminal() || self.terminal_statuses.contains(&status)
    }
}

/// Client-side checks applied before a file is uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Accepted file extensions, compared case-insensitively
    pub allowed_extensions: Vec<String>,
    pub upload_timeout_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: defaults::ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            upload_timeout_ms: defaults::UPLOAD_TIMEOUT_MS,
        }
    }
}

impl UploadConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

impl ClientConfig {
    /// Load configuration from the environment and an optional config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (./optiroute-client.toml or ./config/optiroute-client.toml)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let file = Self::find_config_file();
        if let Some(path) = &file {
            debug!("Loading config from: {}", path.display());
        }
        Self::build(file.as_deref(), ENV_PREFIX)
    }

    /// Load configuration from a specific file, still honoring environment overrides
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        Self::build(Some(path), ENV_PREFIX)
    }

    fn build(file: Option<&Path>, env_prefix: &str) -> ClientResult<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("polling.terminal_statuses")
                .with_list_parse_key("upload.allowed_extensions")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!("Loaded client configuration: {:?}", config);
        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            Path::new("./optiroute-client.toml"),
            Path::new("./config/optiroute-client.toml"),
        ];

        possible_paths
            .iter()
            .find(|path| path.is_file())
            .map(|path| path.to_path_buf())
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> ClientResult<()> {
        reqwest::Url::parse(&self.backend.base_url).map_err(|e| {
            ClientError::config_error(format!(
                "Invalid backend.base_url {}: {}",
                self.backend.base_url, e
            ))
        })?;

        for (name, value) in [
            ("backend.request_timeout_ms", self.backend.request_timeout_ms),
            ("polling.poll_interval_ms", self.polling.poll_interval_ms),
            ("polling.status_timeout_ms", self.polling.status_timeout_ms),
            ("upload.upload_timeout_ms", self.upload.upload_timeout_ms),
        ] {
            if value == 0 {
                return Err(ClientError::config_error(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        let terminal = &self.polling.terminal_statuses;
        if let Some(status) = RawJobStatus::ALL
            .iter()
            .find(|status| status.is_terminal() && !terminal.contains(status))
        {
            return Err(ClientError::config_error(format!(
                "polling.terminal_statuses must contain {status}"
            )));
        }
        if let Some(status) = self
            .polling
            .terminal_statuses
            .iter()
            .find(|status| !status.is_terminal())
        {
            return Err(ClientError::config_error(format!(
                "polling.terminal_statuses cannot contain {status}"
            )));
        }

        if self.upload.allowed_extensions.is_empty() {
            return Err(ClientError::config_error(
                "upload.allowed_extensions must not be empty",
            ));
        }

        Ok(())
    }
}

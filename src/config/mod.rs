mod file_config;

pub use file_config::{FileConfig, GenAiConfig};

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub keep_uploads: bool,
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub analysis_model: String,
    pub image_model: String,
    pub request_timeout_sec: u64,
    pub offline_mode: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            frontend_dir_path: None,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 20 * 1024 * 1024,
            keep_uploads: false,
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout_sec: 120,
            offline_mode: false,
        }
    }
}

/// Why the server runs without calling the generative backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineReason {
    /// Explicitly requested via `--offline` / `USE_FAKE_ANALYSIS`.
    Requested,
    /// No API key was configured.
    MissingApiKey,
}

impl std::fmt::Display for OfflineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfflineReason::Requested => write!(f, "offline mode requested"),
            OfflineReason::MissingApiKey => write!(f, "no API key configured"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server settings
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,

    // Upload settings
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub keep_uploads: bool,

    // Generative backend
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub analysis_model: String,
    pub image_model: String,
    pub request_timeout_sec: u64,
    pub offline_mode: bool,
    pub offline_reason: Option<OfflineReason>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let genai = file.genai.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ (both are {})", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let upload_dir = file
            .upload_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.upload_dir.clone());
        if upload_dir.exists() && !upload_dir.is_dir() {
            bail!("upload_dir is not a directory: {:?}", upload_dir);
        }

        let max_upload_bytes = file.max_upload_bytes.unwrap_or(cli.max_upload_bytes);
        if max_upload_bytes == 0 {
            bail!("max_upload_bytes must be greater than zero");
        }
        let keep_uploads = file.keep_uploads.unwrap_or(cli.keep_uploads);

        let api_key = genai
            .api_key
            .or_else(|| cli.api_key.clone())
            .filter(|key| !key.trim().is_empty());
        let api_base_url = genai
            .api_base_url
            .unwrap_or_else(|| cli.api_base_url.clone());
        let analysis_model = genai
            .analysis_model
            .unwrap_or_else(|| cli.analysis_model.clone());
        let image_model = genai
            .image_model
            .unwrap_or_else(|| cli.image_model.clone());

        let request_timeout_sec = genai
            .request_timeout_sec
            .unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }

        let offline_reason = if genai.offline_mode.unwrap_or(cli.offline_mode) {
            Some(OfflineReason::Requested)
        } else if api_key.is_none() {
            Some(OfflineReason::MissingApiKey)
        } else {
            None
        };

        Ok(Self {
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            upload_dir,
            max_upload_bytes,
            keep_uploads,
            api_key,
            api_base_url,
            analysis_model,
            image_model,
            request_timeout_sec,
            offline_mode: offline_reason.is_some(),
            offline_reason,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            frontend_dir_path: self.frontend_dir_path.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

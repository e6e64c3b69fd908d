use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Server settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,

    // Upload settings
    pub upload_dir: Option<String>,
    pub max_upload_bytes: Option<u64>,
    pub keep_uploads: Option<bool>,

    // Generative backend
    pub genai: Option<GenAiConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct GenAiConfig {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub analysis_model: Option<String>,
    pub image_model: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub offline_mode: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cover_studio_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_API_BASE_URL,
    DEFAULT_IMAGE_MODEL,
};
use cover_studio_server::genai::GeminiBackend;
use cover_studio_server::server::metrics;
use cover_studio_server::{
    run_server, AnalysisRequestor, CoverRequestor, GenAiBackend, RequestsLoggingLevel,
    ServiceMode, UploadStore,
};

#[derive(Parser, Debug)]
#[command(version, about = "Podcast cover art studio server")]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory where uploaded audio is stored while it is analyzed.
    #[clap(long, default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Largest accepted audio upload, in bytes.
    #[clap(long, default_value_t = 20 * 1024 * 1024)]
    pub max_upload_bytes: u64,

    /// Keep uploaded files on disk after the analysis request completes.
    #[clap(long)]
    pub keep_uploads: bool,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// API key for the generative backend. Without one the server runs offline.
    #[clap(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Serve sample data instead of calling the generative backend.
    #[clap(long, env = "USE_FAKE_ANALYSIS", value_parser = parse_flag, default_value = "false")]
    pub offline: bool,

    /// Base URL of the generative backend REST API.
    #[clap(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Model used to analyze audio.
    #[clap(long, default_value = DEFAULT_ANALYSIS_MODEL)]
    pub analysis_model: String,

    /// Model used to generate cover images.
    #[clap(long, default_value = DEFAULT_IMAGE_MODEL)]
    pub image_model: String,

    /// Timeout in seconds for each call to the generative backend.
    #[clap(long, default_value_t = 120)]
    pub request_timeout_sec: u64,
}

/// Accepts the usual spellings of a boolean environment flag (`1`, `true`, `yes`, ...).
fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean flag, got {:?}", other)),
    }
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            upload_dir: self.upload_dir.clone(),
            max_upload_bytes: self.max_upload_bytes,
            keep_uploads: self.keep_uploads,
            api_key: self.api_key.clone(),
            api_base_url: self.api_base_url.clone(),
            analysis_model: self.analysis_model.clone(),
            image_model: self.image_model.clone(),
            request_timeout_sec: self.request_timeout_sec,
            offline_mode: self.offline,
        }
    }
}

fn build_service_mode(config: &AppConfig) -> Result<ServiceMode> {
    if let Some(reason) = config.offline_reason {
        warn!(
            mode = "offline",
            "Running in offline mode ({}): analysis and covers are sample data", reason
        );
        return Ok(ServiceMode::Offline);
    }

    let api_key = config
        .api_key
        .clone()
        .context("API key missing while not in offline mode")?;
    let backend = GeminiBackend::new(
        config.api_base_url.clone(),
        api_key,
        config.analysis_model.clone(),
        config.image_model.clone(),
        config.request_timeout(),
    )
    .context("Failed to create generative backend client")?;

    info!(
        "Using {} backend (analysis: {}, images: {})",
        backend.name(),
        config.analysis_model,
        config.image_model
    );
    Ok(ServiceMode::Live(Arc::new(backend)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Initializing metrics...");
    metrics::init_metrics();

    let mode = build_service_mode(&config)?;

    let upload_store = Arc::new(UploadStore::new(
        config.upload_dir.clone(),
        config.max_upload_bytes,
        config.keep_uploads,
    ));
    upload_store
        .init()
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", config.upload_dir))?;
    info!(
        "Storing uploads in {:?} (max {:#}, keep: {})",
        upload_store.dir(),
        byte_unit::Byte::from(config.max_upload_bytes),
        config.keep_uploads
    );

    let analysis_requestor = Arc::new(AnalysisRequestor::new(
        mode.clone(),
        config.request_timeout(),
    ));
    let cover_requestor = Arc::new(CoverRequestor::new(mode, config.request_timeout()));

    info!("Ready to serve at port {}!", config.port);
    info!("Metrics available at port {}!", config.metrics_port);
    run_server(
        config.server_config(),
        upload_store,
        analysis_requestor,
        cover_requestor,
    )
    .await
}

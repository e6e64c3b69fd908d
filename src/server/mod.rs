pub mod analyze_routes;
pub mod config;
pub mod covers_routes;
pub mod error;
mod http_layers;
pub mod metrics;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::*;
pub use server::run_server;

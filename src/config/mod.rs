// Configuration module entry point
// Loads the server configuration and exposes the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, ContentConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Default config file name, looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default location.
    /// A missing file is not an error: every key has a default.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (extension optional)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("content.static_dir", "./static")?
            .set_default("content.video_dir", "./videos")?
            .set_default("content.video_prefix", "/video/")?
            .set_default("content.video_content_type", "video/mp4")?
            .set_default("content.index_files", vec!["index.html"])?
            .set_default("content.dir_listing", true)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 0)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.content.video_prefix = normalize_prefix(&cfg.content.video_prefix);
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Force a route prefix into the `/name/` shape the router matches against
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Content roots and how requests are mapped onto them
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Root of the static file tree
    pub static_dir: PathBuf,
    /// Root of the video directory
    pub video_dir: PathBuf,
    /// URL prefix routed to the video handler, with leading and trailing slash
    pub video_prefix: String,
    /// Content-Type sent for every video response
    pub video_content_type: String,
    /// Index file names tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Render an HTML listing for directories without an index file
    pub dir_listing: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined or common)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a client may take to send request headers, including the wait
    /// for the next request on a kept-alive connection. 0 disables it; an
    /// in-flight response body is never cut off.
    pub header_read_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("./static"),
            video_dir: PathBuf::from("./videos"),
            video_prefix: "/video/".to_string(),
            video_content_type: "video/mp4".to_string(),
            index_files: vec!["index.html".to_string()],
            dir_listing: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            header_read_timeout: 0,
            max_connections: None,
        }
    }
}


// Application state module
// Shared, read-only per-server state handed to every request

use std::sync::atomic::AtomicUsize;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,

    /// Connections currently being served by this server instance
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            active_connections: AtomicUsize::new(0),
        }
    }

    /// URL prefix routed to the video handler
    pub fn video_prefix(&self) -> &str {
        &self.config.content.video_prefix
    }
}

//! vidserve
//!
//! A small asynchronous HTTP server that serves a static directory tree and
//! streams video files with byte-range support from a separate directory.
//!
//! Requests under the video prefix (`/video/` by default) are resolved against
//! the video root and always served as `video/mp4`; every other path falls
//! through to the static file server.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

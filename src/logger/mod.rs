//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Access logging (combined/common formats)
//! - Per-request video diagnostics
//! - Error and warning logging, optionally to files

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use chrono::Local;
use std::borrow::Cow;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Escape control characters in client-supplied text so one request can
/// only ever produce one log line
pub fn escape_control(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

fn path_text(path: &Path) -> String {
    escape_control(&path.to_string_lossy()).into_owned()
}

fn timestamped(message: &str) -> String {
    format!("{} {message}", Local::now().format("%Y/%m/%d %H:%M:%S"))
}

/// Write to info log
fn write_info(message: &str) {
    let line = timestamped(message);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    let line = timestamped(message);
    match writer::get() {
        Some(w) => w.write_error(&line),
        None => eprintln!("{line}"),
    }
}

/// Write to access log specifically (entries carry their own timestamp)
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info(&format!("Server started at http://{addr}"));
    write_info(&format!(
        "Static root: {}",
        config.content.static_dir.display()
    ));
    write_info(&format!(
        "Video root: {} (served under {})",
        config.content.video_dir.display(),
        config.content.video_prefix
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

/// Startup listing of the video directory
pub fn log_video_dir_contents(dir: &Path, names: &[String]) {
    write_info(&format!("Contents of {}:", dir.display()));
    for name in names {
        write_info(&format!("- {name}"));
    }
}

pub fn log_video_dir_error(dir: &Path, err: &std::io::Error) {
    write_error(&format!(
        "[WARN] Error reading video directory {}: {err}",
        dir.display()
    ));
}

pub fn log_video_requested(name: &str) {
    write_info(&format!("[VIDEO] Requested video: {}", escape_control(name)));
}

pub fn log_video_lookup(path: &Path) {
    write_info(&format!(
        "[VIDEO] Looking for video at path: {}",
        path_text(path)
    ));
}

pub fn log_video_open_error(path: &Path, err: &std::io::Error) {
    write_error(&format!(
        "[VIDEO] Error opening video file {}: {err}",
        path_text(path)
    ));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    log_error(&format!("Failed to bind {addr}: {err}"));
}

pub fn log_shutdown(active_connections: usize) {
    write_info(&format!(
        "[INFO] Shutdown requested, {active_connections} connection(s) still open"
    ));
}

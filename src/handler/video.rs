//! Video stream handler
//!
//! Resolves the name after the video prefix against the video root, opens it
//! and hands the handle to the range-aware content server with a fixed
//! content type.

use crate::config::ContentConfig;
use crate::handler::resolve::resolve_under;
use crate::handler::router::RequestContext;
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::{Response, StatusCode};
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs::{self, File};

/// Body sent for every lookup failure; the cause only goes to the log
pub const NOT_FOUND_MESSAGE: &str = "Video not found";

/// Serve `{video_dir}/{name}` for a request under the video prefix
pub async fn serve_video(ctx: &RequestContext<'_>, content: &ContentConfig) -> Response<ResponseBody> {
    let name = ctx
        .path
        .strip_prefix(content.video_prefix.as_str())
        .unwrap_or_default();
    logger::log_video_requested(name);

    let Some(video_path) = resolve_under(&content.video_dir, name) else {
        logger::log_warning(&format!(
            "Video path escapes the video root: {}",
            logger::escape_control(name)
        ));
        return not_found();
    };
    logger::log_video_lookup(&video_path);

    let file = match open_video(&video_path).await {
        Ok(file) => file,
        Err(e) => {
            logger::log_video_open_error(&video_path, &e);
            return not_found();
        }
    };

    let modified = modified_time(&file, &video_path).await;
    http::serve_content(
        ctx.method,
        ctx.headers,
        &content.video_content_type,
        modified,
        file,
    )
    .await
}

/// Open a regular file for reading; directories count as missing
async fn open_video(path: &Path) -> io::Result<File> {
    let file = File::open(path).await?;
    if file.metadata().await.is_ok_and(|m| m.is_dir()) {
        return Err(io::Error::other(format!(
            "{} is a directory",
            path.display()
        )));
    }
    Ok(file)
}

/// Modification time of the open handle, `None` if it cannot be read
async fn modified_time(file: &File, path: &Path) -> Option<SystemTime> {
    match file.metadata().await.and_then(|m| m.modified()) {
        Ok(t) => Some(t),
        Err(e) => {
            logger::log_warning(&format!(
                "Cannot read modification time of {}: {e}",
                path.display()
            ));
            None
        }
    }
}

fn not_found() -> Response<ResponseBody> {
    http::build_text_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

/// Log the names in the video directory; failures are logged, never fatal
pub async fn log_video_dir_contents(dir: &Path) {
    match list_dir(dir).await {
        Ok(names) => logger::log_video_dir_contents(dir, &names),
        Err(e) => logger::log_video_dir_error(dir, &e),
    }
}

async fn list_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

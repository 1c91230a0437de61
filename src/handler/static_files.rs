//! Static file serving module
//!
//! Maps request paths onto the static root. Regular files go through the
//! range-aware content server with a MIME type inferred from the extension;
//! directories serve their index file or a generated listing.

use crate::config::ContentConfig;
use crate::handler::dir_listing;
use crate::handler::resolve::{clean_path, resolve_under};
use crate::handler::router::RequestContext;
use crate::http::{self, mime, ResponseBody};
use crate::logger;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs::File;

/// Serve a request that did not match the video prefix
pub async fn serve_static(ctx: &RequestContext<'_>, content: &ContentConfig) -> Response<ResponseBody> {
    let Some(path) = resolve_under(&content.static_dir, ctx.path) else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {}",
            logger::escape_control(ctx.path)
        ));
        return http::build_404_response();
    };

    // Redirect targets are built from the cleaned path only, so a request
    // like "//host" can never turn into an off-site Location
    let clean = clean_path(ctx.raw_path);

    // ".../index.html" is canonically served as ".../"
    if let Some(location) = index_redirect(&clean, &content.index_files) {
        return redirect(location, ctx.query);
    }

    let file = match File::open(&path).await {
        Ok(f) => f,
        Err(e) => return open_error_response(&path, &e),
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => return open_error_response(&path, &e),
    };

    if metadata.is_dir() {
        if !ctx.path.ends_with('/') {
            return redirect(format!("{}/", clean.trim_end_matches('/')), ctx.query);
        }
        drop(file);
        return serve_directory(ctx, &path, content).await;
    }

    if ctx.path.ends_with('/') {
        let trimmed = clean.trim_end_matches('/');
        let location = if trimmed.is_empty() { "/" } else { trimmed };
        return redirect(location.to_string(), ctx.query);
    }

    http::serve_content(
        ctx.method,
        ctx.headers,
        mime::content_type_for(&path),
        metadata.modified().ok(),
        file,
    )
    .await
}

/// Serve the first index file found in `dir`, otherwise a listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &Path,
    content: &ContentConfig,
) -> Response<ResponseBody> {
    for index_file in &content.index_files {
        let index_path = dir.join(index_file);
        let Ok(file) = File::open(&index_path).await else {
            continue;
        };
        match file.metadata().await {
            Ok(m) if m.is_file() => {
                return http::serve_content(
                    ctx.method,
                    ctx.headers,
                    mime::content_type_for(&index_path),
                    m.modified().ok(),
                    file,
                )
                .await;
            }
            _ => continue,
        }
    }

    if !content.dir_listing {
        return http::build_404_response();
    }

    match dir_listing::render_listing(dir).await {
        Ok(html) => http::build_html_response(html, ctx.is_head()),
        Err(e) => {
            logger::log_error(&format!(
                "Error reading directory '{}': {e}",
                dir.display()
            ));
            http::build_500_response()
        }
    }
}

/// Location for a request ending in an index file name, if it does
fn index_redirect(path: &str, index_files: &[String]) -> Option<String> {
    index_files.iter().find_map(|index| {
        path
            .strip_suffix(index.as_str())
            .filter(|dir| dir.ends_with('/'))
            .map(ToString::to_string)
    })
}

fn redirect(location: String, query: Option<&str>) -> Response<ResponseBody> {
    let location = match query {
        Some(q) if !q.is_empty() => format!("{location}?{q}"),
        _ => location,
    };
    http::build_redirect_response(&location)
}

fn open_error_response(path: &Path, err: &io::Error) -> Response<ResponseBody> {
    match err.kind() {
        io::ErrorKind::NotFound => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", path.display()));
            http::build_403_response()
        }
        _ => {
            // e.g. a path that walks through a regular file
            logger::log_warning(&format!("Cannot open '{}': {err}", path.display()));
            http::build_404_response()
        }
    }
}

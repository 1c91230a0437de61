//! Range-aware content serving
//!
//! [`serve_content`] is the one place that turns an open file into an HTTP
//! response. It evaluates preconditions, honours a single byte range (subject
//! to `If-Range`), answers HEAD without touching the file contents, and
//! otherwise streams the selected bytes from the handle it was given.

use super::body::{self, ResponseBody};
use super::conditional::{self, Precondition, Validators};
use super::range::{parse_range_header, RangeParseResult};
use super::response::{self, log_build_error};
use crate::logger;
use hyper::header::{
    HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED,
    RANGE,
};
use hyper::http::response::Builder;
use hyper::{Method, Response, StatusCode};
use std::io::{self, SeekFrom};
use std::time::SystemTime;
use tokio::fs::File;
use tokio::io::AsyncSeekExt;

/// Serve an open file with range and conditional request support.
///
/// * `content_type` is sent as-is; callers decide whether to infer it
/// * `modified` of `None` means the modification time is unknown: no
///   `Last-Modified`/`ETag` is sent and time-based preconditions are skipped
/// * the file is consumed; it is closed when the response body is dropped
pub async fn serve_content(
    method: &Method,
    headers: &HeaderMap,
    content_type: &str,
    modified: Option<SystemTime>,
    mut file: File,
) -> Response<ResponseBody> {
    let size = match content_size(&mut file).await {
        Ok(size) => size,
        Err(e) => {
            logger::log_error(&format!("Failed to determine content size: {e}"));
            return response::build_500_response();
        }
    };

    let validators = Validators::new(modified, size);
    match conditional::evaluate(method, headers, &validators) {
        Precondition::NotModified => return response::build_304_response(&validators),
        Precondition::Failed => return response::build_412_response(),
        Precondition::Proceed => {}
    }

    let range_header = if conditional::range_applies(method, headers, &validators) {
        headers.get(RANGE).and_then(|v| v.to_str().ok())
    } else {
        None
    };
    let is_head = *method == Method::HEAD;

    let builder = with_validators(
        Response::builder()
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT_RANGES, "bytes"),
        &validators,
    );

    match parse_range_header(range_header, size) {
        RangeParseResult::Valid(range) => {
            let body = if is_head {
                body::empty()
            } else {
                if let Err(e) = file.seek(SeekFrom::Start(range.start)).await {
                    logger::log_error(&format!("Failed to seek to byte {}: {e}", range.start));
                    return response::build_500_response();
                }
                body::file_window(file, range.content_length())
            };

            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(CONTENT_RANGE, range.content_range(size))
                .header(CONTENT_LENGTH, range.content_length())
                .body(body)
                .unwrap_or_else(|e| {
                    log_build_error("206", &e);
                    response::build_500_response()
                })
        }
        RangeParseResult::NotSatisfiable => response::build_416_response(size),
        RangeParseResult::None => {
            let body = if is_head {
                body::empty()
            } else {
                body::file_window(file, size)
            };

            builder
                .status(StatusCode::OK)
                .header(CONTENT_LENGTH, size)
                .body(body)
                .unwrap_or_else(|e| {
                    log_build_error("200", &e);
                    response::build_500_response()
                })
        }
    }
}

/// Size of the file by seeking to its end, leaving the cursor at the start
async fn content_size(file: &mut File) -> io::Result<u64> {
    let size = file.seek(SeekFrom::End(0)).await?;
    file.seek(SeekFrom::Start(0)).await?;
    Ok(size)
}

fn with_validators(mut builder: Builder, validators: &Validators) -> Builder {
    if let Some(last_modified) = validators.last_modified_header() {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }
    if let Some(etag) = &validators.etag {
        builder = builder.header(ETAG, etag);
    }
    builder
}

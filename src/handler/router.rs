//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! path decoding, dispatching between the video and static handlers, and the
//! access log line.

use crate::config::AppState;
use crate::handler::{static_files, video};
use crate::http::{self, ResponseBody};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::{HeaderMap, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// Percent-decoded request path
    pub path: &'a str,
    /// Request path as received, used when building redirect targets
    pub raw_path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

impl RequestContext<'_> {
    pub fn is_head(&self) -> bool {
        *self.method == Method::HEAD
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; GET, HEAD and OPTIONS carry none worth
/// looking at.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();

    let response = route_request(&parts.method, &parts.uri, &parts.headers, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.to_string(),
            parts.method.to_string(),
            parts
                .uri
                .path_and_query()
                .map_or_else(|| "/".to_string(), ToString::to_string),
        );
        entry.http_version = version_str(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = body_bytes(&response);
        entry.referer = header_string(&parts.headers, &REFERER);
        entry.user_agent = header_string(&parts.headers, &USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request(
    method: &Method,
    uri: &hyper::Uri,
    headers: &HeaderMap,
    state: &AppState,
) -> Response<ResponseBody> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return resp;
    }

    // 2. Decode the path once; handlers only ever see the decoded form
    let raw_path = uri.path();
    let Ok(path) = urlencoding::decode(raw_path) else {
        logger::log_warning(&format!("Request path is not valid UTF-8: {raw_path}"));
        return http::build_400_response();
    };

    let ctx = RequestContext {
        method,
        path: &path,
        raw_path,
        query: uri.query(),
        headers,
    };

    // 3. Dispatch
    let content = &state.config.content;
    let prefix = state.video_prefix();
    if ctx.path.starts_with(prefix) {
        return video::serve_video(&ctx, content).await;
    }
    if prefix.len() > 1 && prefix.strip_suffix('/') == Some(ctx.path) {
        return http::build_redirect_response(prefix);
    }

    static_files::serve_static(&ctx, content).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Bytes in the response body: exact for in-memory bodies, otherwise the
/// declared `Content-Length` of a streamed file
fn body_bytes(response: &Response<ResponseBody>) -> Option<u64> {
    response.body().size_hint().exact().or_else(|| {
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    })
}

fn header_string(headers: &HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

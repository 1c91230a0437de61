//! HTTP response building module
//!
//! Builders for the status responses shared by the handlers, decoupled from
//! any file lookup logic.

use super::body::{self, ResponseBody};
use super::conditional::Validators;
use hyper::header::{
    ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build a plain-text error response with a trailing newline
pub fn build_text_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let text = format!("{message}\n");
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .header(CONTENT_LENGTH, text.len())
        .body(body::full(text))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            fallback(StatusCode::MOVED_PERMANENTLY)
        })
}

/// Build 304 Not Modified response carrying only the validators
pub fn build_304_response(validators: &Validators) -> Response<ResponseBody> {
    let mut builder = Response::builder().status(StatusCode::NOT_MODIFIED);
    if let Some(etag) = &validators.etag {
        builder = builder.header(ETAG, etag);
    } else if let Some(last_modified) = validators.last_modified_header() {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }
    builder.body(body::empty()).unwrap_or_else(|e| {
        log_build_error("304", &e);
        fallback(StatusCode::NOT_MODIFIED)
    })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::BAD_REQUEST, "400 Bad Request")
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::FORBIDDEN, "403 Forbidden")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::NOT_FOUND, "404 page not found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<ResponseBody> {
    let mut resp = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    resp
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(body::empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            fallback(StatusCode::NO_CONTENT)
        })
}

/// Build 412 Precondition Failed response
pub fn build_412_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::PRECONDITION_FAILED, "412 Precondition Failed")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64) -> Response<ResponseBody> {
    let mut resp = build_text_response(
        StatusCode::RANGE_NOT_SATISFIABLE,
        "416 Requested Range Not Satisfiable",
    );
    if let Ok(value) = format!("bytes */{file_size}").parse() {
        resp.headers_mut().insert(CONTENT_RANGE, value);
    }
    resp
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            fallback(StatusCode::OK)
        })
}

fn fallback(status: StatusCode) -> Response<ResponseBody> {
    let mut resp = Response::new(body::empty());
    *resp.status_mut() = status;
    resp
}

/// Log response build error
pub(crate) fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

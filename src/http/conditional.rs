//! HTTP conditional request module
//!
//! Validator generation (`Last-Modified`, `ETag`) and evaluation of the
//! `If-Match`, `If-Unmodified-Since`, `If-None-Match`, `If-Modified-Since` and
//! `If-Range` preconditions, following RFC 7232 section 6.

use chrono::{DateTime, NaiveDateTime, Utc};
use hyper::header::{
    HeaderMap, HeaderName, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, IF_UNMODIFIED_SINCE, RANGE,
};
use hyper::Method;
use std::time::SystemTime;

/// Outcome of precondition evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Serve the representation
    Proceed,
    /// 304 Not Modified
    NotModified,
    /// 412 Precondition Failed
    Failed,
}

/// Validators of one file, computed once per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    /// Modification time truncated to whole seconds; `None` when unknown
    pub last_modified: Option<DateTime<Utc>>,
    /// Strong entity tag; `None` when the modification time is unknown
    pub etag: Option<String>,
}

impl Validators {
    /// Build validators from an optional mtime and the file size.
    ///
    /// Times at or before the Unix epoch are treated as unknown.
    pub fn new(modified: Option<SystemTime>, size: u64) -> Self {
        let last_modified = modified
            .map(DateTime::<Utc>::from)
            .map(|t| truncate_to_seconds(&t))
            .filter(|t| t.timestamp() > 0);

        let etag = last_modified.map(|t| format!("\"{:x}-{size:x}\"", t.timestamp()));

        Self { last_modified, etag }
    }

    /// `Last-Modified` header value, if known
    pub fn last_modified_header(&self) -> Option<String> {
        self.last_modified.as_ref().map(format_http_date)
    }
}

/// Format a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`)
pub fn format_http_date(time: &DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse any of the three HTTP-date formats (IMF-fixdate, RFC 850, asctime)
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Some(t.with_timezone(&Utc));
    }
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Evaluate request preconditions against the file's validators
pub fn evaluate(method: &Method, headers: &HeaderMap, validators: &Validators) -> Precondition {
    let is_read = *method == Method::GET || *method == Method::HEAD;

    // Step 1/2: If-Match, otherwise If-Unmodified-Since
    if let Some(if_match) = header_str(headers, IF_MATCH) {
        if !etag_list_matches(if_match, validators.etag.as_deref(), true) {
            return Precondition::Failed;
        }
    } else if let Some(since) = header_str(headers, IF_UNMODIFIED_SINCE) {
        if let (Some(modified), Some(since)) = (validators.last_modified, parse_http_date(since)) {
            if modified > since {
                return Precondition::Failed;
            }
        }
    }

    // Step 3/4: If-None-Match, otherwise If-Modified-Since (reads only)
    if let Some(if_none_match) = header_str(headers, IF_NONE_MATCH) {
        if etag_list_matches(if_none_match, validators.etag.as_deref(), false) {
            return if is_read {
                Precondition::NotModified
            } else {
                Precondition::Failed
            };
        }
    } else if is_read {
        if let Some(since) = header_str(headers, IF_MODIFIED_SINCE) {
            if let (Some(modified), Some(since)) =
                (validators.last_modified, parse_http_date(since))
            {
                if modified <= since {
                    return Precondition::NotModified;
                }
            }
        }
    }

    Precondition::Proceed
}

/// Whether a `Range` header should be honoured, taking `If-Range` into account
pub fn range_applies(method: &Method, headers: &HeaderMap, validators: &Validators) -> bool {
    if headers.get(RANGE).is_none() {
        return false;
    }
    if *method != Method::GET && *method != Method::HEAD {
        return false;
    }
    let Some(if_range) = header_str(headers, IF_RANGE) else {
        return true;
    };

    let if_range = if_range.trim();
    if if_range.starts_with('"') || if_range.starts_with("W/") {
        return validators
            .etag
            .as_deref()
            .is_some_and(|etag| strong_eq(if_range, etag));
    }

    match (validators.last_modified, parse_http_date(if_range)) {
        (Some(modified), Some(date)) => modified == date,
        _ => false,
    }
}

/// Match a comma-separated entity tag list (or `*`) against our tag
fn etag_list_matches(list: &str, etag: Option<&str>, strong: bool) -> bool {
    let list = list.trim();
    if list == "*" {
        return etag.is_some();
    }
    let Some(etag) = etag else {
        return false;
    };
    list.split(',').map(str::trim).any(|candidate| {
        if strong {
            strong_eq(candidate, etag)
        } else {
            weak_eq(candidate, etag)
        }
    })
}

fn strong_eq(a: &str, b: &str) -> bool {
    !a.starts_with("W/") && !b.starts_with("W/") && a == b
}

fn weak_eq(a: &str, b: &str) -> bool {
    a.trim_start_matches("W/") == b.trim_start_matches("W/")
}

fn truncate_to_seconds(time: &DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or(*time)
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;
    use std::time::{Duration, UNIX_EPOCH};

    // Sun, 06 Nov 1994 08:49:37 GMT
    const MTIME_SECS: u64 = 784_111_777;
    const MTIME: &str = "Sun, 06 Nov 1994 08:49:37 GMT";

    fn validators() -> Validators {
        let mtime = UNIX_EPOCH + Duration::from_millis(MTIME_SECS * 1000 + 250);
        Validators::new(Some(mtime), 100)
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_validators() {
        let v = validators();
        assert_eq!(v.last_modified_header().as_deref(), Some(MTIME));
        assert_eq!(v.etag.as_deref(), Some("\"2ebc98a1-64\""));
    }

    #[test]
    fn test_unknown_mtime_has_no_validators() {
        let v = Validators::new(None, 100);
        assert!(v.last_modified.is_none());
        assert!(v.etag.is_none());
        let epoch = Validators::new(Some(UNIX_EPOCH), 100);
        assert!(epoch.last_modified.is_none());
    }

    #[test]
    fn test_parse_http_date_formats() {
        let expected = DateTime::from_timestamp(784_111_777, 0).unwrap();
        assert_eq!(parse_http_date(MTIME), Some(expected));
        assert_eq!(
            parse_http_date("Sunday, 06-Nov-94 08:49:37 GMT"),
            Some(expected)
        );
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn test_if_modified_since() {
        let v = validators();
        let same = headers(&[("if-modified-since", MTIME)]);
        assert_eq!(evaluate(&Method::GET, &same, &v), Precondition::NotModified);

        let older = headers(&[("if-modified-since", "Sat, 05 Nov 1994 08:49:37 GMT")]);
        assert_eq!(evaluate(&Method::GET, &older, &v), Precondition::Proceed);

        // ignored for unknown mtime
        let unknown = Validators::new(None, 100);
        assert_eq!(evaluate(&Method::GET, &same, &unknown), Precondition::Proceed);
    }

    #[test]
    fn test_if_none_match() {
        let v = validators();
        let etag = v.etag.clone().unwrap();
        let hit = headers(&[("if-none-match", format!("\"other\", W/{etag}").as_str())]);
        assert_eq!(evaluate(&Method::HEAD, &hit, &v), Precondition::NotModified);
        assert_eq!(evaluate(&Method::POST, &hit, &v), Precondition::Failed);

        let miss = headers(&[("if-none-match", "\"other\"")]);
        assert_eq!(evaluate(&Method::GET, &miss, &v), Precondition::Proceed);

        // If-None-Match takes precedence over If-Modified-Since
        let both = headers(&[("if-none-match", "\"other\""), ("if-modified-since", MTIME)]);
        assert_eq!(evaluate(&Method::GET, &both, &v), Precondition::Proceed);
    }

    #[test]
    fn test_if_match_and_unmodified_since() {
        let v = validators();
        let etag = v.etag.clone().unwrap();
        assert_eq!(
            evaluate(&Method::GET, &headers(&[("if-match", etag.as_str())]), &v),
            Precondition::Proceed
        );
        assert_eq!(
            evaluate(&Method::GET, &headers(&[("if-match", "\"other\"")]), &v),
            Precondition::Failed
        );
        assert_eq!(
            evaluate(
                &Method::GET,
                &headers(&[("if-unmodified-since", "Sat, 05 Nov 1994 08:49:37 GMT")]),
                &v
            ),
            Precondition::Failed
        );
        assert_eq!(
            evaluate(&Method::GET, &headers(&[("if-unmodified-since", MTIME)]), &v),
            Precondition::Proceed
        );
    }

    #[test]
    fn test_if_range() {
        let v = validators();
        let etag = v.etag.clone().unwrap();

        assert!(!range_applies(&Method::GET, &headers(&[]), &v));
        assert!(range_applies(
            &Method::GET,
            &headers(&[("range", "bytes=0-9")]),
            &v
        ));
        assert!(range_applies(
            &Method::GET,
            &headers(&[("range", "bytes=0-9"), ("if-range", etag.as_str())]),
            &v
        ));
        assert!(range_applies(
            &Method::GET,
            &headers(&[("range", "bytes=0-9"), ("if-range", MTIME)]),
            &v
        ));
        assert!(!range_applies(
            &Method::GET,
            &headers(&[("range", "bytes=0-9"), ("if-range", "\"stale\"")]),
            &v
        ));
        assert!(!range_applies(
            &Method::GET,
            &headers(&[("range", "bytes=0-9"), ("if-range", format!("W/{etag}").as_str())]),
            &v
        ));
        assert!(!range_applies(
            &Method::GET,
            &headers(&[
                ("range", "bytes=0-9"),
                ("if-range", "Sat, 05 Nov 1994 08:49:37 GMT")
            ]),
            &v
        ));
    }
}

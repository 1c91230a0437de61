//! Response body types
//!
//! Every handler answers with [`ResponseBody`]: small in-memory bodies for
//! status pages and listings, and [`file_window`] for streaming part of an
//! open file without buffering it whole.

use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

/// Boxed body type returned by all handlers
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

/// Read size for one streamed chunk
const CHUNK_SIZE: usize = 64 * 1024;

/// In-memory body
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Empty body (HEAD responses, 304, redirects)
pub fn empty() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Stream at most `len` bytes from the file's current position.
///
/// The body owns the file handle; it is closed when the body is dropped,
/// whether the transfer completed or the client went away.
pub fn file_window(file: File, len: u64) -> ResponseBody {
    let stream = ReaderStream::with_capacity(file.take(len), CHUNK_SIZE).map_ok(Frame::data);
    StreamBody::new(stream).boxed_unsync()
}

//! Test utilities and common setup.

#![allow(dead_code)]

use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper::client::conn::http1;
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use vidserve::config::{AppState, Config};
use vidserve::server;

/// A server bound to an ephemeral loopback port, serving two temp roots.
pub struct TestServer {
    pub addr: SocketAddr,
    pub static_dir: TempDir,
    pub video_dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestServer {
    /// Start a server with default settings and empty roots.
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a server, letting the caller adjust the config first.
    pub async fn start_with(adjust: impl FnOnce(&mut Config)) -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        let video_dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.content.static_dir = static_dir.path().to_path_buf();
        config.content.video_dir = video_dir.path().to_path_buf();
        config.logging.access_log = false;
        adjust(&mut config);

        let listener = server::create_reusable_listener(config.get_socket_addr().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config));

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::start_server_loop(listener, state, async {
            let _ = rx.await;
        }));

        Self {
            addr,
            static_dir,
            video_dir,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    pub fn write_static(&self, relative: &str, contents: impl AsRef<[u8]>) {
        write_file(self.static_dir.path(), relative, contents);
    }

    pub fn write_video(&self, relative: &str, contents: impl AsRef<[u8]>) {
        write_file(self.video_dir.path(), relative, contents);
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, &[]).await
    }

    /// Send one request on a fresh connection and buffer the response.
    pub async fn request(&self, method: Method, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let (parts, body) = self.send(method, path, headers).await.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Send one request on a fresh connection; the body is left unread.
    pub async fn send(&self, method: Method, path: &str, headers: &[(&str, &str)]) -> Response<Incoming> {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", self.addr.to_string());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Empty::<Bytes>::new()).unwrap();

        sender.send_request(req).await.unwrap()
    }

    /// Request shutdown and wait for the server loop to return.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.await.unwrap().unwrap();
        }
    }
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn write_file(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Deterministic non-repeating-ish payload so ranges are easy to check.
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

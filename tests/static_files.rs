//! End-to-end tests for the static file server over a real socket.

use hyper::{Method, StatusCode};

mod common;
use common::TestServer;

#[tokio::test]
async fn test_root_serves_index() {
    let server = TestServer::start().await;
    server.write_static("index.html", "<h1>videos</h1>");

    let resp = server.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("content-type"), Some("text/html; charset=utf-8"));
    assert_eq!(resp.text(), "<h1>videos</h1>");

    server.stop().await;
}

#[tokio::test]
async fn test_root_listing_without_index() {
    let server = TestServer::start().await;
    server.write_static("player.js", "play()");
    server.write_static("css/site.css", "body{}");

    let resp = server.get("/").await;
    assert_eq!(resp.status, StatusCode::OK);
    let html = resp.text();
    assert!(html.contains("<a href=\"css/\">css/</a>"));
    assert!(html.contains("<a href=\"player.js\">player.js</a>"));

    server.stop().await;
}

#[tokio::test]
async fn test_files_and_types() {
    let server = TestServer::start().await;
    server.write_static("player.js", "play()");
    server.write_static("css/site.css", "body{}");

    let resp = server.get("/player.js").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("content-type"), Some("text/javascript; charset=utf-8"));
    assert_eq!(resp.text(), "play()");

    let resp = server.get("/css/site.css").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("content-type"), Some("text/css; charset=utf-8"));

    server.stop().await;
}

#[tokio::test]
async fn test_static_range() {
    let server = TestServer::start().await;
    server.write_static("notes.txt", "0123456789");

    let resp = server
        .request(Method::GET, "/notes.txt", &[("range", "bytes=2-4")])
        .await;
    assert_eq!(resp.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(resp.header("content-range"), Some("bytes 2-4/10"));
    assert_eq!(resp.text(), "234");

    server.stop().await;
}

#[tokio::test]
async fn test_missing_file() {
    let server = TestServer::start().await;

    let resp = server.get("/does/not/exist.html").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.text().trim(), "404 page not found");

    server.stop().await;
}

#[tokio::test]
async fn test_directory_redirect() {
    let server = TestServer::start().await;
    server.write_static("docs/index.html", "docs");

    let resp = server.get("/docs").await;
    assert_eq!(resp.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.header("location"), Some("/docs/"));

    let resp = server.get("/docs/").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text(), "docs");

    server.stop().await;
}

#[tokio::test]
async fn test_unsupported_method() {
    let server = TestServer::start().await;
    server.write_static("index.html", "home");

    let resp = server.request(Method::DELETE, "/index.html", &[]).await;
    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.header("allow"), Some("GET, HEAD, OPTIONS"));

    server.stop().await;
}

#[tokio::test]
async fn test_double_slash_redirect_stays_on_site() {
    let server = TestServer::start().await;
    server.write_static("evil.example/x.txt", "x");

    let resp = server.get("//evil.example").await;
    assert_eq!(resp.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.header("location"), Some("/evil.example/"));

    server.stop().await;
}

//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use catalog_proxy::config::{CredentialMode, EndpointConfig};
use catalog_proxy::{Credential, HttpServer, ProxyConfig};

/// Start an upstream that echoes the request it received as JSON.
///
/// `/redirect` answers 307 to `/landed`; `/cookies` sets two cookies.
/// Every other path echoes method, raw path, raw query, headers and body.
pub async fn start_echo_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/redirect", get(|| async { Redirect::temporary("/landed?via=redirect") }))
        .route("/cookies", get(cookies))
        .route("/", any(echo))
        .route("/{*path}", any(echo));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let mut echoed: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        echoed
            .entry(name.as_str().to_string())
            .or_default()
            .push(value.to_str().unwrap_or_default().to_string());
    }

    let payload = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": echoed,
        "body": String::from_utf8_lossy(&body),
    });

    (
        StatusCode::OK,
        [("x-ratelimit-remaining", "10"), ("keep-alive", "timeout=5")],
        Json(payload),
    )
        .into_response()
}

async fn cookies() -> Response {
    let mut headers = HeaderMap::new();
    headers.append("set-cookie", "a=1".parse().unwrap());
    headers.append("set-cookie", "b=2".parse().unwrap());
    (StatusCode::CREATED, headers, "cookies").into_response()
}

/// Start a raw TCP upstream that returns a fixed response and closes.
pub async fn start_raw_upstream(status_line: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\nX-Upstream: raw\r\n\r\n{}",
                            status_line,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start an upstream that accepts connections and never answers.
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Single endpoint mounted at `/proxy` in front of `upstream`.
pub fn endpoint(upstream: SocketAddr, mode: CredentialMode) -> EndpointConfig {
    EndpointConfig {
        name: "test".to_string(),
        mount_prefix: "/proxy".to_string(),
        upstream_base: format!("http://{}", upstream),
        credential_mode: mode,
        require_credential: None,
    }
}

pub fn config_with(endpoints: Vec<EndpointConfig>) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.timeouts.connect_secs = 2;
    config.timeouts.upstream_secs = 5;
    config.endpoints = endpoints;
    config
}

/// Serve the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig, credential: Option<&str>) -> SocketAddr {
    let server = HttpServer::new(config, credential.map(Credential::new)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::broadcast::channel(1);

    tokio::spawn(async move {
        // Keep the sender alive for the lifetime of the server.
        let _tx = tx;
        server.run(listener, rx).await.unwrap();
    });

    addr
}

/// Client that does not follow redirects, so the proxy's own behavior is observed.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub async fn echoed(response: reqwest::Response) -> Value {
    assert_eq!(response.status(), 200);
    response.json().await.unwrap()
}

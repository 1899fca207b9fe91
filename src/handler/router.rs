//! Request entry point
//!
//! Validates the method, dispatches to the static file handler, and runs
//! the one finalize step every response passes through: isolation header
//! injection. Error responses (404, 405) take the same exit path as
//! successful ones, so the header invariant holds on all of them.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, isolation};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request details the static file handler needs
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = http_version_label(req.version());
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let response = if method == Method::GET || method == Method::HEAD {
        let ctx = RequestContext {
            path: req.uri().path(),
            is_head: method == Method::HEAD,
            if_none_match: header_string(&req, "if-none-match"),
            range_header: header_string(&req, "range"),
        };
        static_files::serve(&ctx, &state).await
    } else if method == Method::OPTIONS {
        http::build_options_response()
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    // The single interception point: every response, whatever its status,
    // gets the isolation headers here before it reaches the wire.
    let response = isolation::apply(response);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(remote_addr.to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version;
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length_of(&response);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn content_length_of<B>(response: &Response<B>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn http_version_label(version: hyper::Version) -> String {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LoggingConfig, PerformanceConfig, ServerConfig, ServingConfig};
    use crate::http::isolation::{EMBEDDER_POLICY, OPENER_POLICY};
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    // Built by hand so tests cannot pick up an isoserve.toml or ISOSERVE_*
    // variables from the environment.
    fn test_config(root: &str) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            serving: ServingConfig {
                root: root.to_string(),
                index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            },
            logging: LoggingConfig {
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
        }
    }

    fn temp_state(files: &[(&str, &[u8])]) -> (PathBuf, Arc<AppState>) {
        let dir = std::env::temp_dir().join(format!(
            "isoserve-router-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        let config = test_config(&dir.to_string_lossy());
        let state = Arc::new(AppState::new(config).unwrap());
        (dir, state)
    }

    fn request(method: &str, path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn remote() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 40000))
    }

    fn assert_isolated<B>(response: &Response<B>) {
        assert_eq!(
            response.headers().get(EMBEDDER_POLICY).unwrap(),
            "require-corp"
        );
        assert_eq!(
            response.headers().get(OPENER_POLICY).unwrap(),
            "same-origin"
        );
    }

    #[tokio::test]
    async fn test_existing_file_served_with_isolation_headers() {
        let (_dir, state) = temp_state(&[("index.html", b"<h1>threads</h1>")]);
        let response = handle_request(request("GET", "/index.html"), state, remote())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_isolated(&response);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<h1>threads</h1>");
    }

    #[tokio::test]
    async fn test_missing_file_is_404_with_isolation_headers() {
        let (_dir, state) = temp_state(&[]);
        let response = handle_request(request("GET", "/does-not-exist.txt"), state, remote())
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_post_is_405_with_isolation_headers() {
        let (_dir, state) = temp_state(&[]);
        let response = handle_request(request("POST", "/index.html"), state, remote())
            .await
            .unwrap();
        assert_eq!(response.status(), 405);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_options_is_204_with_isolation_headers() {
        let (_dir, state) = temp_state(&[]);
        let response = handle_request(request("OPTIONS", "/"), state, remote())
            .await
            .unwrap();
        assert_eq!(response.status(), 204);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_head_has_headers_but_empty_body() {
        let (_dir, state) = temp_state(&[("app.js", b"console.log(1)")]);
        let response = handle_request(request("HEAD", "/app.js"), state, remote())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_isolated(&response);
        assert_eq!(response.headers().get("content-length").unwrap(), "14");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_gets_are_identical() {
        let (_dir, state) = temp_state(&[("a.txt", b"stable")]);
        let first = handle_request(request("GET", "/a.txt"), Arc::clone(&state), remote())
            .await
            .unwrap();
        let second = handle_request(request("GET", "/a.txt"), state, remote())
            .await
            .unwrap();
        assert_eq!(first.status(), second.status());
        assert_eq!(
            first.headers().get("etag").unwrap(),
            second.headers().get("etag").unwrap()
        );
        let first_body = first.into_body().collect().await.unwrap().to_bytes();
        let second_body = second.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(first_body, second_body);
    }
}

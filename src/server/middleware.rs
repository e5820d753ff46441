//! # Middleware
//!
//! Access logging: one line per request, in the common
//! `client - "METHOD path proto" (host) status bytes "agent"` shape.

use hyper::header::{HeaderName, HOST, USER_AGENT};
use hyper::{HeaderMap, Method, Request, StatusCode, Version};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// Header set by reverse proxies with the original client address
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address for logs: the first `X-Forwarded-For` entry when a proxy
/// set one, the peer address otherwise.
#[must_use]
pub fn client_address(headers: &HeaderMap, remote_addr: SocketAddr) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|client| !client.is_empty())
        .map_or_else(|| remote_addr.to_string(), str::to_string)
}

/// Request details captured before the request is handled.
#[derive(Debug, Clone)]
pub struct AccessLog {
    client: String,
    method: Method,
    path: String,
    version: Version,
    host: String,
    user_agent: String,
    start_time: Instant,
}

impl AccessLog {
    /// Capture a request and start timing it.
    pub fn start<B>(request: &Request<B>, remote_addr: SocketAddr) -> Self {
        let headers = request.headers();
        let header = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        let mut host = header(HOST);
        if host.is_empty() {
            host = request.uri().authority().map(ToString::to_string).unwrap_or_default();
        }

        Self {
            client: client_address(headers, remote_addr),
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            version: request.version(),
            host,
            user_agent: header(USER_AGENT),
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    /// The formatted access line.
    #[must_use]
    pub fn line(&self, status: StatusCode, bytes: u64) -> String {
        format!(
            "{} - \"{} {} {:?}\" ({}) {} {} \"{}\"",
            self.client,
            self.method,
            self.path,
            self.version,
            self.host,
            status.as_u16(),
            bytes,
            self.user_agent
        )
    }

    /// Log request completion with timing
    pub fn log_completion(&self, status: StatusCode, bytes: u64) {
        let elapsed = self.start_time.elapsed();
        info!(
            target: "access",
            latency_ms = elapsed.as_secs_f64() * 1000.0,
            "{}",
            self.line(status, bytes)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "10.0.0.7:51234".parse().unwrap()
    }

    #[test]
    fn test_client_address_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_address(&headers, peer()), "10.0.0.7:51234");

        headers.insert(FORWARDED_FOR, "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(client_address(&headers, peer()), "203.0.113.9");
    }

    #[test]
    fn test_client_address_ignores_empty_header() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, "".parse().unwrap());
        assert_eq!(client_address(&headers, peer()), "10.0.0.7:51234");
    }

    #[test]
    fn test_access_line_format() {
        let request = Request::builder()
            .method("GET")
            .uri("/?password=secret")
            .header(HOST, "quiz.example.com")
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();

        let log = AccessLog::start(&request, peer());
        assert_eq!(log.client(), "10.0.0.7:51234");
        // The query string, and so the password, stays out of the access line
        assert_eq!(
            log.line(StatusCode::OK, 42),
            "10.0.0.7:51234 - \"GET / HTTP/1.1\" (quiz.example.com) 200 42 \"curl/8.0\""
        );
    }

    #[test]
    fn test_access_line_without_headers() {
        let request = Request::builder().uri("/x").body(()).unwrap();
        let log = AccessLog::start(&request, peer());

        assert_eq!(
            log.line(StatusCode::MOVED_PERMANENTLY, 0),
            "10.0.0.7:51234 - \"GET /x HTTP/1.1\" () 301 0 \"\""
        );
    }

    #[test]
    fn test_log_completion_does_not_panic() {
        let request = Request::builder().uri("/").body(()).unwrap();
        AccessLog::start(&request, peer()).log_completion(StatusCode::OK, 10);
    }
}

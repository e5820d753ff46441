//! # HTTP Server
//!
//! A small Hyper server in front of the rule chain. Every connection is served
//! on its own Tokio task; the chain is shared read-only behind an `Arc`.
//!
//! Every request, whatever its method or path, gets the quiz answer, or a
//! redirect to HTTPS when `--redirect-https` is set. Each request produces one
//! access log line.

pub mod config;
pub mod handlers;
pub mod middleware;

pub use config::ServerConfig;
pub use handlers::{QuizHandler, QuizResponse};

use crate::chain::RuleChain;
use crate::error::{QuizError, Result};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use middleware::AccessLog;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Pause after a failed `accept`, so a persistent error (EMFILE) cannot spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Per-request routing, shared by every connection task.
#[derive(Debug)]
struct QuizService {
    quiz: QuizHandler,
    redirect_https: bool,
}

impl QuizService {
    fn respond<B>(&self, request: &Request<B>, remote_addr: SocketAddr) -> Response<Full<Bytes>> {
        let access = AccessLog::start(request, remote_addr);

        let result = if self.redirect_https {
            handlers::redirect_to_https(request, access.client())
        } else {
            self.quiz.handle(request)
        };

        let response = result.unwrap_or_else(|e| {
            if e.is_critical() {
                error!(
                    "Critical error handling request from {}: {}",
                    access.client(),
                    e.internal_message()
                );
            } else {
                warn!("Request error from {}: {}", access.client(), e.internal_message());
            }
            create_error_response(StatusCode::INTERNAL_SERVER_ERROR, e.client_message())
        });

        let bytes = response.body().size_hint().exact().unwrap_or_default();
        access.log_completion(response.status(), bytes);
        response
    }
}

/// Password quiz server bound to its listening socket
#[derive(Debug)]
pub struct QuizServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    service: Arc<QuizService>,
}

impl QuizServer {
    /// Build the rule chain and bind the listening socket.
    ///
    /// ## Errors
    /// - `QuizError::Config`: the listen address is invalid
    /// - `QuizError::Server`: the address could not be bound
    #[instrument(level = "info", name = "server_bind", skip(config))]
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let bind_addr = config.bind_addr()?;

        let chain = Arc::new(RuleChain::new(config.rule_catalog));
        info!(
            "Using rule catalog '{}' ({} rules)",
            chain.catalog(),
            chain.len()
        );

        let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
            error!("Failed to bind to address {}: {}", bind_addr, e);
            QuizError::server_error(
                format!("Failed to bind to address {bind_addr}: {e}"),
                Some(Box::new(e)),
            )
        })?;

        let local_addr = listener.local_addr().map_err(|e| {
            QuizError::server_error(
                format!("Failed to read local address: {e}"),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            listener,
            local_addr,
            service: Arc::new(QuizService {
                quiz: QuizHandler::new(chain, config.audit_attempts),
                redirect_https: config.redirect_https,
            }),
        })
    }

    /// The address actually bound, useful with port 0.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until `shutdown` is cancelled.
    ///
    /// Connections already accepted keep running on their own tasks.
    #[instrument(level = "info", name = "server_serve", skip(self, shutdown))]
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        info!("Starting on port {}", self.local_addr.port());

        loop {
            let (stream, remote_addr) = tokio::select! {
                () = shutdown.cancelled() => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(connection) => connection,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        continue;
                    }
                },
            };

            let service = Arc::clone(&self.service);

            tokio::task::spawn(async move {
                if let Err(e) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(
                        TokioIo::new(stream),
                        service_fn(move |request: Request<hyper::body::Incoming>| {
                            let service = Arc::clone(&service);
                            async move {
                                Ok::<_, Infallible>(service.respond(&request, remote_addr))
                            }
                        }),
                    )
                    .await
                {
                    warn!("Connection error from {}: {}", remote_addr, e);
                }
            });
        }
    }
}

/// Generic JSON error body, only used when a quiz answer could not be built.
pub fn create_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": message,
        "status": status.as_u16(),
    })
    .to_string();

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static(handlers::JSON_CONTENT_TYPE),
    );
    response
}

/// Bind and serve until `shutdown` is cancelled.
///
/// ## Example
/// ```rust,no_run
/// use password_quiz::{start_server, ServerConfig};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::default();
///     start_server(config, CancellationToken::new()).await?;
///     Ok(())
/// }
/// ```
///
/// ## Errors
/// See [`QuizServer::bind`].
pub async fn start_server(config: ServerConfig, shutdown: CancellationToken) -> Result<()> {
    let server = QuizServer::bind(config).await?;
    server.serve(shutdown).await
}

impl From<hyper::http::Error> for QuizError {
    fn from(err: hyper::http::Error) -> Self {
        Self::server_error(format!("HTTP error: {err}"), Some(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::RuleCatalog;
    use http_body_util::BodyExt;

    #[test]
    fn test_accept_error_backoff() {
        assert!(ACCEPT_ERROR_BACKOFF >= Duration::from_millis(10));
        assert!(ACCEPT_ERROR_BACKOFF < Duration::from_secs(1));
    }

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        }
    }

    fn peer() -> SocketAddr {
        "192.0.2.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = QuizServer::bind(test_config()).await.unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert!(server.local_addr().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_invalid_host() {
        let mut config = test_config();
        config.host = "quiz.local".to_string();

        let result = QuizServer::bind(config).await;
        assert!(matches!(result, Err(QuizError::Config { .. })));
    }

    #[tokio::test]
    async fn test_bind_port_in_use() {
        let first = QuizServer::bind(test_config()).await.unwrap();
        let mut config = test_config();
        config.port = first.local_addr().port();

        let result = QuizServer::bind(config).await;
        assert!(matches!(result, Err(QuizError::Server { .. })));
    }

    #[tokio::test]
    async fn test_respond_quiz() {
        let server = QuizServer::bind(test_config()).await.unwrap();
        let request = Request::builder().uri("/?password=ABCDEFGHIJKL").body(()).unwrap();

        let response = server.service.respond(&request, peer());
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: QuizResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Password must contain at least 1 number");
    }

    #[tokio::test]
    async fn test_respond_uses_configured_catalog() {
        let mut config = test_config();
        config.rule_catalog = RuleCatalog::Standard;
        let server = QuizServer::bind(config).await.unwrap();

        let request = Request::builder()
            .uri("/?password=Abcdefgh1%21%5B%CE%B1%F0%9F%98%80%3AD")
            .body(())
            .unwrap();
        let response = server.service.respond(&request, peer());

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: QuizResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body.message,
            "Password must not contain any of the following special characters: ^, (, ), [, ], or @"
        );
    }

    #[tokio::test]
    async fn test_respond_redirect_mode() {
        let mut config = test_config();
        config.redirect_https = true;
        let server = QuizServer::bind(config).await.unwrap();

        let request = Request::builder()
            .uri("/?password=abc")
            .header(hyper::header::HOST, "quiz.example.com:8080")
            .body(())
            .unwrap();
        let response = server.service.respond(&request, peer());

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[hyper::header::LOCATION],
            "https://quiz.example.com/?password=abc"
        );
    }

    #[tokio::test]
    async fn test_serve_stops_on_cancel() {
        let server = QuizServer::bind(test_config()).await.unwrap();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(server.serve(shutdown.clone()));

        shutdown.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_error_response_creation() {
        let response =
            create_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[hyper::header::CONTENT_TYPE], handlers::JSON_CONTENT_TYPE);
    }

    #[test]
    fn test_http_error_conversion() {
        let http_error: hyper::http::Error = Response::builder()
            .header("bad header\n", "value")
            .body(())
            .unwrap_err();
        let quiz_error: QuizError = http_error.into();

        assert!(quiz_error.is_critical());
        assert_eq!(quiz_error.client_message(), "Internal server error");
    }
}

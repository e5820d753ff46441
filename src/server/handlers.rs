//! # Request Handlers
//!
//! - [`QuizHandler`]: reads `password` from the query string, runs the rule
//!   chain and answers `{"message": ...}` with status 200, whatever the verdict.
//! - [`redirect_to_https`]: answers 301 towards the same URL over HTTPS.

use crate::chain::{RuleChain, Verdict};
use crate::error::{QuizError, Result};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE, HOST, LOCATION};
use hyper::{Request, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Content type of every quiz answer
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body of every quiz answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub message: String,
}

impl From<Verdict> for QuizResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            message: verdict.message(),
        }
    }
}

/// Extracts the `password` query parameter.
///
/// A missing query string or parameter yields an empty password. With
/// repeated keys the first one wins. Decoding never fails: bad escapes are
/// replaced lossily.
#[must_use]
pub fn password_from_query(query: Option<&str>) -> SecretString {
    let password = query
        .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
        .and_then(|pairs| {
            pairs
                .into_iter()
                .find(|(key, _)| key == "password")
                .map(|(_, value)| value)
        })
        .unwrap_or_default();
    SecretString::new(password.into())
}

/// Audit log line for one attempt. Contains the password in clear.
fn audit_line(password: &SecretString, verdict: Verdict) -> String {
    match verdict {
        Verdict::Rejected(violation) => {
            format!("Attempt: {}, Error: {}", password.expose_secret(), violation)
        }
        Verdict::AlreadyUsed => format!("Attempt: {}, Evaded issues", password.expose_secret()),
    }
}

/// Handler for quiz requests
#[derive(Debug, Clone)]
pub struct QuizHandler {
    chain: Arc<RuleChain>,
    audit_attempts: bool,
}

impl QuizHandler {
    #[must_use]
    pub fn new(chain: Arc<RuleChain>, audit_attempts: bool) -> Self {
        Self {
            chain,
            audit_attempts,
        }
    }

    /// Evaluate the password of a request.
    ///
    /// Only the URI is looked at, so any method, path and body type is accepted.
    pub fn verdict<B>(&self, request: &Request<B>) -> Verdict {
        let password = password_from_query(request.uri().query());
        let verdict = self.chain.evaluate(&password);

        if self.audit_attempts {
            info!(target: "audit", "{}", audit_line(&password, verdict));
        }

        verdict
    }

    /// Answer a quiz request.
    ///
    /// ## Errors
    /// - `QuizError::Internal`: the answer could not be serialized
    /// - `QuizError::Server`: the response could not be built
    pub fn handle<B>(&self, request: &Request<B>) -> Result<Response<Full<Bytes>>> {
        let verdict = self.verdict(request);
        debug!("Quiz verdict: rejected={}", verdict.is_rejected());

        let body = serde_json::to_vec(&QuizResponse::from(verdict)).map_err(|e| {
            QuizError::internal_error(
                format!("Failed to serialize quiz response: {e}"),
                Some(Box::new(e)),
            )
        })?;

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(CACHE_CONTROL, "no-cache")
            .body(Full::new(Bytes::from(body)))?)
    }
}

/// Drops the port from a `Host` value, keeping IPv6 brackets.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

/// The HTTPS URL a request should be redirected to.
#[must_use]
pub fn https_location<B>(request: &Request<B>) -> String {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .map(strip_port)
        .filter(|host| !host.is_empty())
        .unwrap_or("localhost");

    let path_and_query = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());

    format!("https://{host}{path_and_query}")
}

/// Permanently redirect a request to its HTTPS equivalent.
///
/// ## Errors
/// - `QuizError::Server`: the response could not be built
pub fn redirect_to_https<B>(request: &Request<B>, client: &str) -> Result<Response<Full<Bytes>>> {
    let location = https_location(request);
    info!("{} - Redirect to HTTPS ({})", client, location);

    Ok(Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .body(Full::new(Bytes::new()))?)
}

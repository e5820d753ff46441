//! Password quiz library
//!
//! Runs a candidate password through an ordered chain of rules and answers with
//! the message of the first rule it breaks. A password that passes every rule is
//! still refused: it "has already been used by another user".
//!
//! # Features
//!
//! - `server` (default): Hyper HTTP server and the `password-quiz` binary
//! - `tracing`: Enables logging via tracing crate (implied by `server`)
//!
//! # Environment Variables
//!
//! Read by the server configuration:
//!
//! - `PORT`: listening port (default: `8080`)
//! - `BIND_HOST`: listening address (default: `0.0.0.0`)
//! - `RULE_CATALOG`: `standard` or `extended` (default: `extended`)
//! - `AUDIT_ATTEMPTS`: log every attempted password (default: `false`)
//! - `REDIRECT_HTTPS`: redirect every request to HTTPS (default: `false`)
//! - `LOG_LEVEL`: tracing level (default: `info`)
//!
//! # Example
//!
//! ```rust
//! use password_quiz::{evaluate_password, Verdict};
//! use secrecy::SecretString;
//!
//! let password = SecretString::new("ABCDEFGHIJKL".to_string().into());
//! let verdict = evaluate_password(&password);
//!
//! assert!(verdict.is_rejected());
//! assert_eq!(verdict.message(), "Password must contain at least 1 number");
//! ```

pub mod chain;
pub mod error;
pub mod rules;

#[cfg(feature = "server")]
pub mod server;

// Public API
pub use chain::{
    default_chain, evaluate_password, RuleCatalog, RuleChain, UnknownCatalog, Verdict,
    ALREADY_USED_MESSAGE,
};
pub use error::{QuizError, Result, RuleViolation};

#[cfg(feature = "server")]
pub use server::{start_server, QuizServer, ServerConfig};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

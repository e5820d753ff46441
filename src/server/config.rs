//! # Server Configuration
//!
//! Configuration is read from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Default values
//!
//! The only setting the quiz strictly needs is `PORT`, defaulting to 8080.

use crate::chain::RuleCatalog;
use crate::error::{QuizError, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tracing::{metadata::ParseLevelError, Level};

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// Default listening address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Wrapper for `tracing::Level` so it can be parsed by clap and compared in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLevel(Level);

impl LogLevel {
    #[must_use]
    pub fn inner(&self) -> Level {
        self.0
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        Self(level)
    }
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Password quiz server configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "password-quiz",
    about = "Guess a password that satisfies every rule",
    version,
    long_about = None
)]
pub struct ServerConfig {
    /// IP address to listen on
    ///
    /// "0.0.0.0" listens on every interface, "127.0.0.1" on loopback only.
    #[arg(
        long = "host",
        value_name = "ADDRESS",
        default_value = DEFAULT_HOST,
        env = "BIND_HOST",
        help = "IP address to listen on"
    )]
    pub host: String,

    /// TCP port to listen on. 0 picks a free port.
    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        default_value_t = DEFAULT_PORT,
        env = "PORT",
        help = "TCP port to listen on"
    )]
    pub port: u16,

    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        default_value = "info",
        env = "LOG_LEVEL",
        help = "Logging level (error, warn, info, debug, trace)"
    )]
    pub log_level: LogLevel,

    /// Which built-in rule catalog to quiz players with
    #[arg(
        long = "rule-catalog",
        value_name = "NAME",
        default_value = "extended",
        env = "RULE_CATALOG",
        help = "Rule catalog version (standard, extended)"
    )]
    pub rule_catalog: RuleCatalog,

    /// Log every attempted password together with the answer given.
    ///
    /// Off by default: attempted passwords end up in plain text in the logs.
    #[arg(
        long = "audit-attempts",
        env = "AUDIT_ATTEMPTS",
        help = "Log attempted passwords (sensitive)"
    )]
    pub audit_attempts: bool,

    /// Answer every request with a permanent redirect to the HTTPS URL
    #[arg(
        long = "redirect-https",
        env = "REDIRECT_HTTPS",
        help = "Redirect every request to https://"
    )]
    pub redirect_https: bool,
}

impl ServerConfig {
    /// Parse command-line arguments, falling back to environment variables.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Build a configuration from environment variables only.
    ///
    /// ## Errors
    /// - `QuizError::Config`: a variable is set but does not parse
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("BIND_HOST") {
            config.host = host;
        }

        if let Ok(port) = std::env::var("PORT") {
            // An empty PORT means "use the default"
            if !port.is_empty() {
                config.port = port.parse().map_err(|e| {
                    QuizError::config_error(
                        format!("Invalid port '{port}': {e}"),
                        Some(Box::new(e)),
                    )
                })?;
            }
        }

        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.log_level = log_level.parse().map_err(|e| {
                QuizError::config_error(
                    format!("Invalid log level '{log_level}': {e}"),
                    Some(Box::new(e)),
                )
            })?;
        }

        if let Ok(catalog) = std::env::var("RULE_CATALOG") {
            config.rule_catalog = catalog.parse().map_err(|e| {
                QuizError::config_error(format!("Invalid rule catalog: {e}"), Some(Box::new(e)))
            })?;
        }

        if let Ok(audit) = std::env::var("AUDIT_ATTEMPTS") {
            config.audit_attempts = audit.parse().map_err(|e| {
                QuizError::config_error(
                    format!("Invalid audit attempts '{audit}': {e}"),
                    Some(Box::new(e)),
                )
            })?;
        }

        if let Ok(redirect) = std::env::var("REDIRECT_HTTPS") {
            config.redirect_https = redirect.parse().map_err(|e| {
                QuizError::config_error(
                    format!("Invalid redirect https '{redirect}': {e}"),
                    Some(Box::new(e)),
                )
            })?;
        }

        Ok(config)
    }

    /// Socket address built from `host` and `port`.
    ///
    /// ## Errors
    /// - `QuizError::Config`: `host` is not an IP address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|e| {
            QuizError::config_error(
                format!("Invalid host address '{}': {e}", self.host),
                Some(Box::new(e)),
            )
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Check the configuration before starting.
    ///
    /// ## Errors
    /// - `QuizError::Config`: the listen address is invalid
    pub fn validate(&self) -> Result<()> {
        let bind_addr = self.bind_addr()?;

        if bind_addr.ip().is_unspecified() {
            tracing::warn!(
                "Binding to wildcard address {} - ensure this is secure for your environment",
                bind_addr
            );
        }

        if self.audit_attempts {
            tracing::warn!(
                "Audit logging is enabled: attempted passwords will be written to the log"
            );
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: LogLevel::from(Level::INFO),
            rule_catalog: RuleCatalog::default(),
            audit_attempts: false,
            redirect_https: false,
        }
    }
}

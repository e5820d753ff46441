//! Error types.
//!
//! Two families live here:
//!
//! - [`RuleViolation`]: one variant per quiz rule. Its `Display` output is the
//!   exact message returned to the player, so a failing rule never needs to
//!   format anything itself.
//! - [`QuizError`]: startup and transport failures of the HTTP service. These
//!   never reach the player as a quiz answer.

use thiserror::Error;

/// Result type alias for the server side of the crate.
pub type Result<T> = std::result::Result<T, QuizError>;

/// A quiz rule that the password did not satisfy.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("No password was provided")]
    Missing,
    #[error("Password must be at least {min} characters long")]
    TooShort { min: usize },
    #[error("Password must be less than {} characters long", .max + 1)]
    TooLong { max: usize },
    #[error("Password must contain at least 1 number")]
    NoDigit,
    #[error("Password must contain at least 1 lowercase letter")]
    NoLowercase,
    #[error("Password must contain at least 1 uppercase letter")]
    NoUppercase,
    #[error("Password must contain at least one of the following special characters: {listed}")]
    NoAllowedSpecial { listed: &'static str },
    #[error("Password must not contain any of the following special characters: {listed}")]
    ForbiddenSpecial { listed: &'static str },
    #[error("Password must contain at least 1 greek letter")]
    NoGreekLetter,
    #[error("Each digit in the password must be less than or equal to all previous digits")]
    DigitsNotDescending,
    #[error("Password must contain at least 1 emoji")]
    NoEmoji,
    #[error("Password must contain at least one named planetary satellite from our solar system")]
    NoSatellite,
    #[error("Password, when stripped of non-numeric characters, must be a number divisible by 3")]
    NotDivisibleByThree,
    #[error("Password must contain at least 1 emoticon")]
    NoEmoticon,
}

/// Failures of the HTTP service itself.
///
/// Every variant keeps an internal message for logs. None of them is shown to
/// the player verbatim; see [`QuizError::client_message`].
#[derive(Error, Debug)]
pub enum QuizError {
    /// Invalid configuration (bad address, unknown catalog name, bad env value)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Binding, accepting or building a response failed
    #[error("Server error: {message}")]
    Server {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Anything else that should not happen, e.g. JSON serialization
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl QuizError {
    #[inline]
    pub fn config_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::Config {
            message: message.into(),
            source,
        }
    }

    #[inline]
    pub fn server_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::Server {
            message: message.into(),
            source,
        }
    }

    #[inline]
    pub fn internal_error<T>(
        message: T,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self
    where
        T: Into<String>,
    {
        Self::Internal {
            message: message.into(),
            source,
        }
    }

    /// Message safe to put in a response body.
    #[must_use]
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::Server { .. } | Self::Internal { .. } => {
                "Internal server error"
            }
        }
    }

    /// Full message including the source chain, for logs only.
    #[must_use]
    pub fn internal_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }

    /// Critical errors stop the process instead of a single request.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Server { .. })
    }

    /// Process exit code used by the binary.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,
            Self::Server { .. } => 2,
            Self::Internal { .. } => 3,
        }
    }
}

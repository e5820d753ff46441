//! Presence and length rules.
//!
//! Lengths are counted in Unicode scalar values, so an emoji counts as one
//! character no matter how many bytes it takes.

use super::RuleResult;
use crate::error::RuleViolation;
use secrecy::{ExposeSecret, SecretString};

pub const MIN_LENGTH: usize = 12;
pub const MAX_LENGTH: usize = 20;

/// Fails on the empty string.
pub fn non_empty(password: &SecretString) -> RuleResult {
    if password.expose_secret().is_empty() {
        return Err(RuleViolation::Missing);
    }
    Ok(())
}

/// Fails when the password has fewer than [`MIN_LENGTH`] characters.
pub fn min_length(password: &SecretString) -> RuleResult {
    if password.expose_secret().chars().count() < MIN_LENGTH {
        return Err(RuleViolation::TooShort { min: MIN_LENGTH });
    }
    Ok(())
}

/// Fails when the password has more than [`MAX_LENGTH`] characters.
pub fn max_length(password: &SecretString) -> RuleResult {
    if password.expose_secret().chars().count() > MAX_LENGTH {
        return Err(RuleViolation::TooLong { max: MAX_LENGTH });
    }
    Ok(())
}

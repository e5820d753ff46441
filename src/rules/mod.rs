//! Password quiz rules
//!
//! Each rule checks a single constraint and is a plain function, so a chain is
//! nothing more than an ordered slice of them.

mod composition;
mod digits;
mod length;
mod script;
mod trivia;

pub use composition::{
    contains_allowed_special, contains_digit, contains_lowercase, contains_uppercase,
    excludes_bracket_specials, excludes_star_specials,
};
pub use digits::{digits_divisible_by_three, digits_non_increasing};
pub use length::{max_length, min_length, non_empty, MAX_LENGTH, MIN_LENGTH};
pub use script::{contains_emoji, contains_greek_letter};
pub use trivia::{contains_emoticon, contains_satellite, EMOTICONS, SATELLITES};

use crate::error::RuleViolation;
use secrecy::SecretString;

/// Result type for rule functions.
/// - `Ok(())` - Rule passed
/// - `Err(violation)` - Rule failed, `violation` renders the player-facing message
pub type RuleResult = Result<(), RuleViolation>;

/// Signature shared by every rule.
pub type RuleFn = fn(&SecretString) -> RuleResult;

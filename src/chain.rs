//! Rule chain - ordered evaluation of the quiz rules.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use secrecy::SecretString;
use thiserror::Error;

use crate::error::RuleViolation;
use crate::rules::{
    contains_allowed_special, contains_digit, contains_emoji, contains_emoticon,
    contains_greek_letter, contains_lowercase, contains_satellite, contains_uppercase,
    digits_divisible_by_three, digits_non_increasing, excludes_bracket_specials,
    excludes_star_specials, max_length, min_length, non_empty, RuleFn,
};

/// Answer given when a password passes every rule.
pub const ALREADY_USED_MESSAGE: &str = "This password has already been used by another user";

static DEFAULT_CHAIN: Lazy<RuleChain> = Lazy::new(|| RuleChain::new(RuleCatalog::Extended));

/// Built-in rule catalog versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleCatalog {
    /// Eleven rules, forbids `^ ( ) [ ] @`.
    Standard,
    /// Fourteen rules, forbids `^ * @`, adds the digit order, moon and
    /// divisibility rules.
    #[default]
    Extended,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown rule catalog '{0}' (expected 'standard' or 'extended')")]
pub struct UnknownCatalog(pub String);

impl RuleCatalog {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }

    /// Named rules of this catalog, in evaluation order.
    #[must_use]
    pub fn rules(self) -> Vec<(&'static str, RuleFn)> {
        let mut rules: Vec<(&'static str, RuleFn)> = vec![
            ("non_empty", non_empty),
            ("min_length", min_length),
            ("max_length", max_length),
            ("digit", contains_digit),
            ("lowercase", contains_lowercase),
            ("uppercase", contains_uppercase),
            ("allowed_special", contains_allowed_special),
        ];

        match self {
            Self::Standard => {
                let tail: [(&'static str, RuleFn); 4] = [
                    ("forbidden_special", excludes_bracket_specials),
                    ("greek_letter", contains_greek_letter),
                    ("emoji", contains_emoji),
                    ("emoticon", contains_emoticon),
                ];
                rules.extend(tail);
            }
            Self::Extended => {
                let tail: [(&'static str, RuleFn); 7] = [
                    ("forbidden_special", excludes_star_specials),
                    ("greek_letter", contains_greek_letter),
                    ("digit_order", digits_non_increasing),
                    ("emoji", contains_emoji),
                    ("satellite", contains_satellite),
                    ("divisible_by_three", digits_divisible_by_three),
                    ("emoticon", contains_emoticon),
                ];
                rules.extend(tail);
            }
        }

        rules
    }
}

impl fmt::Display for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleCatalog {
    type Err = UnknownCatalog;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "extended" => Ok(Self::Extended),
            _ => Err(UnknownCatalog(s.to_string())),
        }
    }
}

/// Outcome of running a password through a [`RuleChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The first rule that failed.
    Rejected(RuleViolation),
    /// Every rule passed. The quiz still refuses the password.
    AlreadyUsed,
}

impl Verdict {
    /// The single message shown to the player.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(violation) => fmt::Display::fmt(violation, f),
            Self::AlreadyUsed => f.write_str(ALREADY_USED_MESSAGE),
        }
    }
}

/// An immutable, ordered list of rules.
///
/// Built once and shared read-only; evaluation takes `&self` and keeps no
/// state between calls.
#[derive(Clone)]
pub struct RuleChain {
    catalog: RuleCatalog,
    rules: Vec<(&'static str, RuleFn)>,
}

impl RuleChain {
    #[must_use]
    pub fn new(catalog: RuleCatalog) -> Self {
        Self {
            catalog,
            rules: catalog.rules(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> RuleCatalog {
        self.catalog
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(name, _)| *name)
    }

    /// Runs the rules in order and stops at the first failure.
    pub fn evaluate(&self, password: &SecretString) -> Verdict {
        for (rule_name, rule_fn) in &self.rules {
            if let Err(violation) = rule_fn(password) {
                #[cfg(feature = "tracing")]
                tracing::debug!(rule = *rule_name, catalog = %self.catalog, "password rejected");
                #[cfg(not(feature = "tracing"))]
                let _ = rule_name;
                return Verdict::Rejected(violation);
            }
        }
        Verdict::AlreadyUsed
    }
}

impl fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("catalog", &self.catalog)
            .field("rules", &self.rules.iter().map(|(name, _)| *name).collect::<Vec<_>>())
            .finish()
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new(RuleCatalog::default())
    }
}

/// Process-wide chain for the default catalog, built on first use.
pub fn default_chain() -> &'static RuleChain {
    &DEFAULT_CHAIN
}

/// Evaluates a password against the default chain.
pub fn evaluate_password(password: &SecretString) -> Verdict {
    default_chain().evaluate(password)
}

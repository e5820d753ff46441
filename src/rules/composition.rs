//! Character class rules - digits, ASCII letters, special characters.

use super::RuleResult;
use crate::error::RuleViolation;
use secrecy::{ExposeSecret, SecretString};

const ALLOWED_SPECIALS: &[char] = &['!', '"', '#', '$', '%', '&', '\'', '+', '?'];
const ALLOWED_SPECIALS_LISTED: &str = "!, \", #, $, %, &, ', +, or ?";

const STAR_SPECIALS: &[char] = &['^', '*', '@'];
const STAR_SPECIALS_LISTED: &str = "^, *, or @";

const BRACKET_SPECIALS: &[char] = &['^', '(', ')', '[', ']', '@'];
const BRACKET_SPECIALS_LISTED: &str = "^, (, ), [, ], or @";

fn require(
    password: &SecretString,
    found: impl Fn(char) -> bool,
    violation: RuleViolation,
) -> RuleResult {
    if password.expose_secret().chars().any(found) {
        Ok(())
    } else {
        Err(violation)
    }
}

fn forbid(password: &SecretString, forbidden: &[char], listed: &'static str) -> RuleResult {
    if password.expose_secret().contains(forbidden) {
        return Err(RuleViolation::ForbiddenSpecial { listed });
    }
    Ok(())
}

/// Requires at least one ASCII digit.
pub fn contains_digit(password: &SecretString) -> RuleResult {
    require(password, |c| c.is_ascii_digit(), RuleViolation::NoDigit)
}

/// Requires at least one ASCII lowercase letter. Other scripts do not count.
pub fn contains_lowercase(password: &SecretString) -> RuleResult {
    require(password, |c| c.is_ascii_lowercase(), RuleViolation::NoLowercase)
}

/// Requires at least one ASCII uppercase letter.
pub fn contains_uppercase(password: &SecretString) -> RuleResult {
    require(password, |c| c.is_ascii_uppercase(), RuleViolation::NoUppercase)
}

pub fn contains_allowed_special(password: &SecretString) -> RuleResult {
    require(
        password,
        |c| ALLOWED_SPECIALS.contains(&c),
        RuleViolation::NoAllowedSpecial {
            listed: ALLOWED_SPECIALS_LISTED,
        },
    )
}

/// Forbids `^`, `*` and `@`.
pub fn excludes_star_specials(password: &SecretString) -> RuleResult {
    forbid(password, STAR_SPECIALS, STAR_SPECIALS_LISTED)
}

/// Forbids `^`, brackets, parentheses and `@`.
pub fn excludes_bracket_specials(password: &SecretString) -> RuleResult {
    forbid(password, BRACKET_SPECIALS, BRACKET_SPECIALS_LISTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_contains_digit() {
        assert_eq!(contains_digit(&secret("ABCDEFGHIJKL")), Err(RuleViolation::NoDigit));
        assert_eq!(contains_digit(&secret("ABCDEF7HIJKL")), Ok(()));
        // Non-ASCII digits are not numbers here
        assert_eq!(contains_digit(&secret("٣ABCDEFGHIJK")), Err(RuleViolation::NoDigit));
    }

    #[test]
    fn test_ascii_letter_classes() {
        assert_eq!(contains_lowercase(&secret("ABC123αβγ")), Err(RuleViolation::NoLowercase));
        assert_eq!(contains_lowercase(&secret("ABC123x")), Ok(()));
        assert_eq!(contains_uppercase(&secret("abc123ΑΒΓ")), Err(RuleViolation::NoUppercase));
        assert_eq!(contains_uppercase(&secret("abc123X")), Ok(()));
    }

    #[test]
    fn test_allowed_special() {
        let result = contains_allowed_special(&secret("Abcdefghij12"));
        assert!(matches!(result, Err(RuleViolation::NoAllowedSpecial { .. })));
        if let Err(violation) = result {
            assert!(violation.to_string().ends_with("!, \", #, $, %, &, ', +, or ?"));
        }

        for c in ["!", "\"", "#", "$", "%", "&", "'", "+", "?"] {
            assert_eq!(contains_allowed_special(&secret(c)), Ok(()), "{c} should be allowed");
        }
        assert!(contains_allowed_special(&secret("-_=.,")).is_err());
    }

    #[test]
    fn test_star_specials_forbidden() {
        for pwd in ["a^b", "a*b", "a@b"] {
            assert_eq!(
                excludes_star_specials(&secret(pwd)),
                Err(RuleViolation::ForbiddenSpecial { listed: "^, *, or @" })
            );
        }
        assert_eq!(excludes_star_specials(&secret("a(b)[c]")), Ok(()));
    }

    #[test]
    fn test_bracket_specials_forbidden() {
        for pwd in ["a^b", "a(b", "a)b", "a[b", "a]b", "a@b"] {
            assert!(excludes_bracket_specials(&secret(pwd)).is_err(), "{pwd} should fail");
        }
        assert_eq!(excludes_bracket_specials(&secret("a*b")), Ok(()));
    }
}

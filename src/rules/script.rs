//! Unicode script rules - Greek letters and emoji.

use super::RuleResult;
use crate::error::RuleViolation;
use secrecy::{ExposeSecret, SecretString};

/// Greek and Coptic, Greek Extended.
fn is_greek(c: char) -> bool {
    matches!(c, '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}')
}

/// Emoticons, Transport and Map Symbols, Miscellaneous Symbols.
fn is_emoji(c: char) -> bool {
    matches!(c, '\u{1F600}'..='\u{1F6FF}' | '\u{2600}'..='\u{26FF}')
}

pub fn contains_greek_letter(password: &SecretString) -> RuleResult {
    if password.expose_secret().chars().any(is_greek) {
        return Ok(());
    }
    Err(RuleViolation::NoGreekLetter)
}

pub fn contains_emoji(password: &SecretString) -> RuleResult {
    if password.expose_secret().chars().any(is_emoji) {
        return Ok(());
    }
    Err(RuleViolation::NoEmoji)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_greek_letters() {
        assert_eq!(contains_greek_letter(&secret("Password1!")), Err(RuleViolation::NoGreekLetter));
        assert_eq!(contains_greek_letter(&secret("Password1!λ")), Ok(()));
        assert_eq!(contains_greek_letter(&secret("Ω")), Ok(()));
        // Greek Extended
        assert_eq!(contains_greek_letter(&secret("ἀ")), Ok(()));
    }

    #[test]
    fn test_emoji_ranges() {
        assert_eq!(contains_emoji(&secret("😀")), Ok(()));
        assert_eq!(contains_emoji(&secret("🚀")), Ok(()));
        assert_eq!(contains_emoji(&secret("☀")), Ok(()));
        assert_eq!(contains_emoji(&secret("⛔")), Ok(()));
    }

    #[test]
    fn test_emoji_outside_ranges() {
        // Outside the accepted blocks
        assert_eq!(contains_emoji(&secret("🤖")), Err(RuleViolation::NoEmoji));
        assert_eq!(contains_emoji(&secret("[|]")), Err(RuleViolation::NoEmoji));
        assert_eq!(contains_emoji(&secret(":)")), Err(RuleViolation::NoEmoji));
    }
}

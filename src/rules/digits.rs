//! Digit sequence rules.
//!
//! Only ASCII digits take part. Both rules look at the digits in reading order
//! and ignore every other character.

use super::RuleResult;
use crate::error::RuleViolation;
use secrecy::{ExposeSecret, SecretString};

fn ascii_digits(password: &str) -> impl Iterator<Item = u32> + '_ {
    password.chars().filter_map(|c| {
        if c.is_ascii_digit() {
            c.to_digit(10)
        } else {
            None
        }
    })
}

/// Each digit must be less than or equal to the one before it.
pub fn digits_non_increasing(password: &SecretString) -> RuleResult {
    let mut last = 9;
    for digit in ascii_digits(password.expose_secret()) {
        if digit > last {
            return Err(RuleViolation::DigitsNotDescending);
        }
        last = digit;
    }
    Ok(())
}

/// The digits, read as one number, must be divisible by 3.
///
/// Uses the digit sum, so any number of digits is fine. A password without
/// digits has no number to test and fails.
pub fn digits_divisible_by_three(password: &SecretString) -> RuleResult {
    let mut seen = false;
    let mut remainder = 0;
    for digit in ascii_digits(password.expose_secret()) {
        seen = true;
        remainder = (remainder + digit) % 3;
    }
    if seen && remainder == 0 {
        Ok(())
    } else {
        Err(RuleViolation::NotDivisibleByThree)
    }
}

//! World seeds as typed by players.
//!
//! Seed text that reads as a decimal `i64` is used verbatim. Anything else is
//! hashed with Java's `String.hashCode`, which is how the game turns word
//! seeds into numbers.

use thiserror::Error;

/// Errors returned while normalizing seed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// The seed text was empty or only whitespace.
    #[error("seed must not be empty")]
    InvalidSeedFormat,
}

/// Converts seed text into the 64-bit world seed.
pub fn normalize(input: &str) -> Result<i64, SeedError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SeedError::InvalidSeedFormat);
    }
    Ok(trimmed
        .parse::<i64>()
        .unwrap_or_else(|_| i64::from(java_string_hash(trimmed))))
}

/// Java's `String.hashCode` over the UTF-16 code units of `text`.
#[must_use]
pub fn java_string_hash(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

//! Input validation for explanation text.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Hard cap on explanation length; anything larger is rejected rather
/// than truncated.
pub const MAX_EXPLANATION_LEN: usize = 32_768;

lazy_static! {
    // At least one alphabetic word of two or more characters.
    static ref WORD_PATTERN: Regex = Regex::new(r"[A-Za-z]{2,}").unwrap();
}

/// Errors for malformed explanation input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("explanation is empty")]
    Empty,

    #[error("explanation contains no words")]
    NoWords,

    #[error("explanation exceeds {max} bytes (got {got})")]
    TooLong { max: usize, got: usize },
}

/// Validate an explanation before any scoring happens.
pub fn validate(text: &str) -> Result<(), InputError> {
    if text.trim().is_empty() {
        return Err(InputError::Empty);
    }
    if text.len() > MAX_EXPLANATION_LEN {
        return Err(InputError::TooLong {
            max: MAX_EXPLANATION_LEN,
            got: text.len(),
        });
    }
    if !WORD_PATTERN.is_match(text) {
        return Err(InputError::NoWords);
    }
    Ok(())
}

//! Structural validation shared by every transport adapter.
//!
//! Constraints are plain predicate functions declared once per input type.
//! Adapters call [`Validator::validate`] before reaching the use case, so a
//! given input passes or fails identically over HTTP, gRPC and AMQP-RPC.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use translation_sdk::TranslationRequest;

/// Maximum length of the text to translate, in characters.
pub const MAX_TEXT_CHARS: usize = 5000;

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2})?$").expect("static regex should not panic")
});

/// A violated field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {constraint}")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Human-readable constraint that failed.
    pub constraint: &'static str,
}

/// A single field predicate. `Err` carries the constraint message.
pub type Rule = fn(&str) -> Result<(), &'static str>;

/// Field predicates.
pub mod rules {
    use super::{LANGUAGE_TAG, MAX_TEXT_CHARS};

    /// Value must contain something other than whitespace.
    ///
    /// # Errors
    /// Returns the constraint message when the value is blank.
    pub fn required(value: &str) -> Result<(), &'static str> {
        if value.trim().is_empty() {
            Err("must not be empty")
        } else {
            Ok(())
        }
    }

    /// Value must not exceed [`MAX_TEXT_CHARS`] characters.
    ///
    /// # Errors
    /// Returns the constraint message when the value is too long.
    pub fn text_length(value: &str) -> Result<(), &'static str> {
        if value.chars().count() > MAX_TEXT_CHARS {
            Err("must be at most 5000 characters")
        } else {
            Ok(())
        }
    }

    /// Value must be a 2-5 character language tag such as `en`, `vie` or `zh-CN`.
    ///
    /// # Errors
    /// Returns the constraint message when the tag is not recognized.
    pub fn language_tag(value: &str) -> Result<(), &'static str> {
        if (2..=5).contains(&value.len()) && LANGUAGE_TAG.is_match(value) {
            Ok(())
        } else {
            Err("must be a 2-5 character language tag")
        }
    }
}

/// Run `rules` against `value` in order, reporting the first failure.
///
/// # Errors
/// Returns the first violated constraint for `field`.
pub fn check(field: &'static str, value: &str, rules: &[Rule]) -> Result<(), ValidationError> {
    for rule in rules {
        rule(value).map_err(|constraint| ValidationError { field, constraint })?;
    }
    Ok(())
}

/// Inputs with declared constraints.
pub trait Validate {
    /// # Errors
    /// Returns the first violated constraint.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for TranslationRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check("text", &self.text, &[rules::required, rules::text_length])?;
        check(
            "sourceLang",
            &self.source_lang,
            &[rules::required, rules::language_tag],
        )?;
        check(
            "targetLang",
            &self.target_lang,
            &[rules::required, rules::language_tag],
        )
    }
}

/// Validation adapter handed to every transport adapter.
#[derive(Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check `input` against its declared constraints. Pure; never touches the use case.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate<T: Validate + ?Sized>(self, input: &T) -> Result<(), ValidationError> {
        input.validate().inspect_err(|e| {
            tracing::debug!(field = e.field, constraint = e.constraint, "input rejected");
        })
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

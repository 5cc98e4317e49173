use chrono::{DateTime, Utc};

/// Input of a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Output of a translation.
///
/// `source_lang` is the detected or confirmed source language, which may
/// differ from the requested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// One entry of a requester's translation history. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    /// Original text.
    pub text: String,
    /// Translated text.
    pub translation: String,
    pub source_lang: String,
    pub target_lang: String,
    pub created_at: DateTime<Utc>,
}

impl TranslationRecord {
    #[must_use]
    pub fn new(request: &TranslationRequest, result: &TranslationResult, created_at: DateTime<Utc>) -> Self {
        Self {
            text: request.text.clone(),
            translation: result.text.clone(),
            source_lang: result.source_lang.clone(),
            target_lang: result.target_lang.clone(),
            created_at,
        }
    }
}

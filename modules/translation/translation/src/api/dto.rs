//! JSON payloads shared by the REST and AMQP-RPC adapters.
//!
//! Both transports speak the same camelCase JSON, so a body accepted by one
//! is accepted by the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use translation_sdk::{TranslationRecord, TranslationRequest, TranslationResult};
use utoipa::ToSchema;

/// Request body of `do-translate`.
///
/// Missing fields decode as empty strings and are then reported by validation,
/// the same way an unset proto3 field is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequestDto {
    #[serde(default)]
    #[schema(example = "text for translation")]
    pub text: String,
    #[serde(default)]
    #[schema(example = "en")]
    pub source_lang: String,
    #[serde(default)]
    #[schema(example = "vi")]
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResultDto {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// One history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecordDto {
    pub text: String,
    pub translation: String,
    pub source_lang: String,
    pub target_lang: String,
    pub created_at: DateTime<Utc>,
}

/// Error body returned by the REST adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "message")]
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<TranslationRequestDto> for TranslationRequest {
    fn from(dto: TranslationRequestDto) -> Self {
        Self::new(dto.text, dto.source_lang, dto.target_lang)
    }
}

impl From<TranslationResult> for TranslationResultDto {
    fn from(result: TranslationResult) -> Self {
        Self {
            text: result.text,
            source_lang: result.source_lang,
            target_lang: result.target_lang,
        }
    }
}

impl From<TranslationRecord> for TranslationRecordDto {
    fn from(record: TranslationRecord) -> Self {
        Self {
            text: record.text,
            translation: record.translation,
            source_lang: record.source_lang,
            target_lang: record.target_lang,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case() {
        let dto: TranslationRequestDto =
            serde_json::from_str(r#"{"text":"hi","sourceLang":"en","targetLang":"vi"}"#).unwrap();
        assert_eq!(dto.source_lang, "en");
        assert_eq!(dto.target_lang, "vi");
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let dto: TranslationRequestDto = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(dto.source_lang, "");
        assert_eq!(dto.target_lang, "");
    }

    #[test]
    fn wrong_types_fail_to_decode() {
        assert!(serde_json::from_str::<TranslationRequestDto>(r#"{"text":42}"#).is_err());
    }

    #[test]
    fn record_serializes_rfc3339_timestamp() {
        let created_at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let dto = TranslationRecordDto {
            text: "hi".into(),
            translation: "xin chao".into(),
            source_lang: "en".into(),
            target_lang: "vi".into(),
            created_at,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["createdAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["sourceLang"], "en");
    }
}

//! Wire types exchanged with the analysis backend, plus the versioned adapter
//! that turns either fit-score payload shape into the canonical [`FitScoreResult`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::analysis::{FeedbackCategory, FeedbackItem, FitScoreResult};

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptionRequest<'a> {
    pub job_description: &'a str,
}

/// Generic `{message, status}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResumeUploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub character_count: Option<u32>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// A file handed to `POST /api/resume-upload`.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: bytes::Bytes,
}

/// Error body fields. Only string values are kept; the backend sometimes
/// nests objects under `error`, which carry nothing displayable.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl ErrorBody {
    pub(crate) fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub(crate) fn error(&self) -> Option<String> {
        as_text(self.error.as_ref())
    }

    pub(crate) fn message(&self) -> Option<String> {
        as_text(self.message.as_ref())
    }
}

fn as_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fit-score payload versions
// ────────────────────────────────────────────────────────────────────────────

/// Current shape: `{fit_score, matched_skills, feedback: [{category, text}]}`.
#[derive(Debug, Deserialize)]
pub struct FitScorePayloadV2 {
    pub fit_score: i64,
    pub matched_skills: Vec<String>,
    pub feedback: Vec<FeedbackItem>,
}

/// Legacy shape: `{fit_score, matched_keywords, suggestions: [string]}`.
/// Suggestions describe missing skills, so they migrate as `skills` feedback.
#[derive(Debug, Deserialize)]
pub struct FitScorePayloadV1 {
    pub fit_score: i64,
    pub matched_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FitScorePayload {
    V2(FitScorePayloadV2),
    V1(FitScorePayloadV1),
}

impl FitScorePayload {
    pub fn into_result(self) -> FitScoreResult {
        match self {
            FitScorePayload::V2(p) => FitScoreResult {
                fit_score: clamp_score(p.fit_score),
                matched_skills: p.matched_skills,
                feedback: p.feedback,
            },
            FitScorePayload::V1(p) => FitScoreResult {
                fit_score: clamp_score(p.fit_score),
                matched_skills: p.matched_keywords,
                feedback: p
                    .suggestions
                    .into_iter()
                    .map(|text| FeedbackItem::new(FeedbackCategory::Skills, text))
                    .collect(),
            },
        }
    }
}

fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_payload_maps_directly() {
        let payload: FitScorePayload = serde_json::from_str(
            r#"{"fit_score":85,"matched_skills":["JavaScript","React"],
                "feedback":[{"category":"formatting","text":"Use bullet points"}]}"#,
        )
        .unwrap();
        let result = payload.into_result();
        assert_eq!(result.fit_score, 85);
        assert_eq!(result.matched_skills, vec!["JavaScript", "React"]);
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(result.feedback[0].category, FeedbackCategory::Formatting);
    }

    #[test]
    fn test_legacy_payload_migrates_keywords_and_suggestions() {
        let payload: FitScorePayload = serde_json::from_str(
            r#"{"message":"Fit score calculated successfully.","status":"success",
                "fit_score":42,"matched_keywords":["python"],
                "missing_keywords":["docker"],
                "suggestions":["Include experience with docker."]}"#,
        )
        .unwrap();
        let result = payload.into_result();
        assert_eq!(result.fit_score, 42);
        assert_eq!(result.matched_skills, vec!["python"]);
        assert_eq!(
            result.feedback,
            vec![FeedbackItem::new(
                FeedbackCategory::Skills,
                "Include experience with docker."
            )]
        );
    }

    #[test]
    fn test_score_is_clamped_into_percentage_range() {
        let payload: FitScorePayload = serde_json::from_str(
            r#"{"fit_score":140,"matched_skills":[],"feedback":[]}"#,
        )
        .unwrap();
        assert_eq!(payload.into_result().fit_score, 100);
    }

    #[test]
    fn test_unexpected_feedback_category_keeps_result() {
        let payload: FitScorePayload = serde_json::from_str(
            r#"{"fit_score":72,"matched_skills":["Rust"],"feedback":[
                {"category":"skills","text":"Add Tokio"},
                {"category":"education","text":"List your degree"}
            ]}"#,
        )
        .unwrap();
        let result = payload.into_result();
        assert_eq!(result.fit_score, 72);
        assert_eq!(result.feedback[1].category, FeedbackCategory::General);
    }

    #[test]
    fn test_unrecognised_payload_fails_to_parse() {
        let parsed = serde_json::from_str::<FitScorePayload>(r#"{"fit_score":10}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_error_body_keeps_only_string_fields() {
        let body = ErrorBody::parse(r#"{"error":{"message":"Invalid credentials"}}"#);
        assert!(body.error().is_none());

        let body = ErrorBody::parse(r#"{"error":"Email or password is not recognized"}"#);
        assert_eq!(
            body.error().as_deref(),
            Some("Email or password is not recognized")
        );
    }

    #[test]
    fn test_error_body_tolerates_non_json() {
        let body = ErrorBody::parse("<html>502 Bad Gateway</html>");
        assert!(body.error().is_none());
        assert!(body.message().is_none());
    }
}

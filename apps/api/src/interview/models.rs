use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One interview, from scheduling through analysis.
///
/// The source of truth for pipeline state is the pair of booleans
/// `recording_processed` / `analyzed` plus the nullable content fields —
/// a transcript is only ever written after `recording_id` is set, and
/// scores only after a transcript exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub recruiter_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
    /// Meeting id at the video provider.
    pub meeting_id: String,
    /// Recording asset id, set once the provider has processed a recording.
    pub recording_id: Option<String>,
    pub transcript: Option<String>,
    /// JSONB array of `QuestionScore`. Overwritten, never appended to.
    pub question_scores: Option<Value>,
    /// 1–5 holistic rating from the analyzer.
    pub overall_score: Option<i16>,
    pub decision: Option<String>,
    pub recording_processed: bool,
    pub analyzed: bool,
    /// Optimistic-concurrency token. Every update is compare-and-set on
    /// this field; see `InterviewStore::update`.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One rubric question's evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScore {
    /// 1-based position in the submitted question list.
    pub question_id: u32,
    /// Copied from the input list at analysis time.
    pub question_text: String,
    /// 0–100.
    pub score: u8,
    pub feedback: String,
}

/// Categorical hiring outcome, derived solely from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    NotSelected,
    OnHold,
    AdditionalInterviewRequired,
    Selected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::NotSelected => "NOT_SELECTED",
            Decision::OnHold => "ON_HOLD",
            Decision::AdditionalInterviewRequired => "ADDITIONAL_INTERVIEW_REQUIRED",
            Decision::Selected => "SELECTED",
        }
    }
}

/// Validated 1–5 overall rating. Constructed only by the transcript
/// analyzer, so downstream code never sees an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallScore(u8);

impl OverallScore {
    pub fn new(value: i64) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_score_accepts_1_through_5() {
        for v in 1..=5 {
            assert_eq!(OverallScore::new(v).unwrap().get(), v as u8);
        }
    }

    #[test]
    fn test_overall_score_rejects_out_of_range() {
        assert!(OverallScore::new(0).is_none());
        assert!(OverallScore::new(6).is_none());
        assert!(OverallScore::new(-1).is_none());
        assert!(OverallScore::new(100).is_none());
    }

    #[test]
    fn test_decision_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&Decision::AdditionalInterviewRequired).unwrap();
        assert_eq!(json, "\"ADDITIONAL_INTERVIEW_REQUIRED\"");
        assert_eq!(
            serde_json::to_string(&Decision::OnHold).unwrap(),
            "\"ON_HOLD\""
        );
    }

    #[test]
    fn test_decision_as_str_matches_serde_form() {
        for decision in [
            Decision::NotSelected,
            Decision::OnHold,
            Decision::AdditionalInterviewRequired,
            Decision::Selected,
        ] {
            let json = serde_json::to_string(&decision).unwrap();
            assert_eq!(json.trim_matches('"'), decision.as_str());
        }
    }

    #[test]
    fn test_question_score_serializes_camel_case() {
        let score = QuestionScore {
            question_id: 1,
            question_text: "Tell me about Rust.".to_string(),
            score: 80,
            feedback: "ok".to_string(),
        };
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["questionId"], 1);
        assert_eq!(json["questionText"], "Tell me about Rust.");
    }
}

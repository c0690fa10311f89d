//! Transcript analyzer — submits a transcript plus rubric questions to the
//! LLM and validates the semi-structured response into typed scores.
//!
//! The raw model output is not guaranteed to be pure JSON (it may be
//! wrapped in prose), so parsing locates the first balanced `{...}` block
//! and parses only that substring. Any structural violation is surfaced as
//! `AnalysisError::Malformed` — a guessed score would corrupt the hiring
//! record, so nothing is ever defaulted.

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

use crate::interview::models::{OverallScore, QuestionScore};
use crate::interview::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::llm_client::{CompletionBackend, LlmError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("LLM backend error: {0}")]
    Backend(#[from] LlmError),

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

/// Validated output of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// One entry per input question, ordered by question id.
    pub question_scores: Vec<QuestionScore>,
    pub overall: OverallScore,
    pub overall_feedback: String,
}

/// Analyzes a transcript against the given rubric questions.
///
/// The model is instructed to answer in a fixed JSON shape at low
/// temperature; the output is still not byte-deterministic across calls,
/// so callers must only rely on the structural invariants validated here.
pub async fn analyze(
    transcript: &str,
    questions: &[String],
    llm: &dyn CompletionBackend,
) -> Result<AnalysisResult, AnalysisError> {
    let prompt = build_analysis_prompt(transcript, questions);
    let raw = llm.complete(ANALYSIS_SYSTEM, &prompt).await?;
    debug!("Analysis response received ({} bytes)", raw.len());
    parse_analysis(&raw, questions)
}

// Wire shape of the model response. `questionId` arrives as either a JSON
// number or a stringified ordinal ("1", "2", ...); both are accepted and
// normalized to an integer here, never re-parsed downstream.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(rename = "questionScores")]
    question_scores: Vec<RawQuestionScore>,
    #[serde(rename = "overallScore")]
    overall_score: i64,
    #[serde(rename = "overallFeedback")]
    overall_feedback: String,
}

#[derive(Debug, Deserialize)]
struct RawQuestionScore {
    #[serde(rename = "questionId", deserialize_with = "ordinal_from_int_or_string")]
    question_id: u32,
    score: i64,
    feedback: String,
}

fn ordinal_from_int_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ordinal {
        Int(u32),
        Text(String),
    }

    match Ordinal::deserialize(deserializer)? {
        Ordinal::Int(n) => Ok(n),
        Ordinal::Text(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid question ordinal '{s}'"))),
    }
}

/// Parses and validates a raw model response against the question list.
pub fn parse_analysis(raw: &str, questions: &[String]) -> Result<AnalysisResult, AnalysisError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| AnalysisError::Malformed("no JSON object found in response".to_string()))?;

    let parsed: RawAnalysis = serde_json::from_str(json)
        .map_err(|e| AnalysisError::Malformed(format!("invalid response shape: {e}")))?;

    if parsed.question_scores.len() != questions.len() {
        return Err(AnalysisError::Malformed(format!(
            "expected {} question scores, got {}",
            questions.len(),
            parsed.question_scores.len()
        )));
    }

    let overall = OverallScore::new(parsed.overall_score).ok_or_else(|| {
        AnalysisError::Malformed(format!(
            "overallScore {} outside 1-5",
            parsed.overall_score
        ))
    })?;

    let mut question_scores = Vec::with_capacity(parsed.question_scores.len());
    let mut seen = vec![false; questions.len()];

    for raw_score in parsed.question_scores {
        let ordinal = raw_score.question_id as usize;
        if ordinal < 1 || ordinal > questions.len() {
            return Err(AnalysisError::Malformed(format!(
                "questionId {} outside 1-{}",
                raw_score.question_id,
                questions.len()
            )));
        }
        if seen[ordinal - 1] {
            return Err(AnalysisError::Malformed(format!(
                "duplicate questionId {}",
                raw_score.question_id
            )));
        }
        seen[ordinal - 1] = true;

        if !(0..=100).contains(&raw_score.score) {
            return Err(AnalysisError::Malformed(format!(
                "score {} for question {} outside 0-100",
                raw_score.score, raw_score.question_id
            )));
        }

        question_scores.push(QuestionScore {
            question_id: raw_score.question_id,
            question_text: questions[ordinal - 1].clone(),
            score: raw_score.score as u8,
            feedback: raw_score.feedback,
        });
    }

    question_scores.sort_by_key(|s| s.question_id);

    Ok(AnalysisResult {
        question_scores,
        overall,
        overall_feedback: parsed.overall_feedback,
    })
}

/// Returns the first balanced `{...}` block in `text`, respecting JSON
/// string literals and escapes while counting braces.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Question {i}?")).collect()
    }

    const PROSE_WRAPPED: &str = "Sure! Here is the result: {\"questionScores\":[{\"questionId\":\"1\",\"score\":80,\"feedback\":\"ok\"}],\"overallScore\":3,\"overallFeedback\":\"fine\"}";

    #[test]
    fn test_extract_json_object_plain() {
        assert_eq!(extract_json_object("{\"a\": 1}"), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_extract_json_object_wrapped_in_prose() {
        let extracted = extract_json_object("Here you go: {\"a\": {\"b\": 2}} hope that helps!");
        assert_eq!(extracted, Some("{\"a\": {\"b\": 2}}"));
    }

    #[test]
    fn test_extract_json_object_ignores_braces_in_strings() {
        let input = r#"{"feedback": "used } and { in code", "score": 1}"#;
        assert_eq!(extract_json_object(input), Some(input));
    }

    #[test]
    fn test_extract_json_object_handles_escaped_quotes() {
        let input = r#"{"feedback": "said \"close}\" twice"}"#;
        assert_eq!(extract_json_object(input), Some(input));
    }

    #[test]
    fn test_extract_json_object_none_without_object() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("unbalanced { only").is_none());
    }

    #[test]
    fn test_parse_prose_wrapped_response_with_string_ordinal() {
        let result = parse_analysis(PROSE_WRAPPED, &questions(1)).unwrap();
        assert_eq!(result.question_scores.len(), 1);
        assert_eq!(result.question_scores[0].question_id, 1);
        assert_eq!(result.question_scores[0].score, 80);
        assert_eq!(result.question_scores[0].question_text, "Question 1?");
        assert_eq!(result.overall.get(), 3);
        assert_eq!(result.overall_feedback, "fine");
    }

    #[test]
    fn test_parse_accepts_integer_ordinal() {
        let raw = r#"{"questionScores":[{"questionId":1,"score":55,"feedback":"ok"}],"overallScore":2,"overallFeedback":"meh"}"#;
        let result = parse_analysis(raw, &questions(1)).unwrap();
        assert_eq!(result.question_scores[0].question_id, 1);
    }

    #[test]
    fn test_parse_orders_scores_by_question_id() {
        let raw = r#"{"questionScores":[
            {"questionId":2,"score":60,"feedback":"b"},
            {"questionId":1,"score":70,"feedback":"a"}
        ],"overallScore":4,"overallFeedback":"good"}"#;
        let result = parse_analysis(raw, &questions(2)).unwrap();
        assert_eq!(result.question_scores[0].question_id, 1);
        assert_eq!(result.question_scores[0].question_text, "Question 1?");
        assert_eq!(result.question_scores[1].question_id, 2);
    }

    #[test]
    fn test_parse_rejects_missing_question_scores_key() {
        let raw = r#"{"overallScore":3,"overallFeedback":"fine"}"#;
        let err = parse_analysis(raw, &questions(1)).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_count_mismatch() {
        let err = parse_analysis(PROSE_WRAPPED, &questions(2)).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_overall_score_out_of_range() {
        for overall in [0, 6, -3, 100] {
            let raw = format!(
                r#"{{"questionScores":[{{"questionId":1,"score":80,"feedback":"ok"}}],"overallScore":{overall},"overallFeedback":"fine"}}"#
            );
            let err = parse_analysis(&raw, &questions(1)).unwrap_err();
            assert!(matches!(err, AnalysisError::Malformed(_)), "overall {overall}");
        }
    }

    #[test]
    fn test_parse_rejects_question_score_out_of_range() {
        let raw = r#"{"questionScores":[{"questionId":1,"score":101,"feedback":"ok"}],"overallScore":3,"overallFeedback":"fine"}"#;
        let err = parse_analysis(raw, &questions(1)).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_ordinal_outside_question_list() {
        let raw = r#"{"questionScores":[{"questionId":3,"score":50,"feedback":"ok"}],"overallScore":3,"overallFeedback":"fine"}"#;
        let err = parse_analysis(raw, &questions(1)).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_duplicate_ordinals() {
        let raw = r#"{"questionScores":[
            {"questionId":1,"score":50,"feedback":"a"},
            {"questionId":1,"score":60,"feedback":"b"}
        ],"overallScore":3,"overallFeedback":"fine"}"#;
        let err = parse_analysis(raw, &questions(2)).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_non_numeric_string_ordinal() {
        let raw = r#"{"questionScores":[{"questionId":"one","score":50,"feedback":"a"}],"overallScore":3,"overallFeedback":"fine"}"#;
        let err = parse_analysis(raw, &questions(1)).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }
}

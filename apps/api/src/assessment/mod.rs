//! Assessment generation — builds a skill-based assessment from the
//! skills list the candidate/resume store extracted upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub mod handlers;

/// Time allowed per skill section, in seconds.
const SECTION_TIME_SECS: u32 = 1800;
/// Multiple-choice questions generated per skill.
const QUESTIONS_PER_SKILL: u32 = 5;
/// Skills that additionally get a free-form coding question.
const CODING_SKILLS: [&str; 5] = ["JavaScript", "Python", "Java", "React", "Node.js"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub title: String,
    /// JSONB array of `AssessmentSection`.
    pub sections: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    Coding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSection {
    pub title: String,
    pub questions: Vec<AssessmentQuestion>,
    pub time_allowed_secs: u32,
}

/// Builds one section per skill: five multiple-choice questions, plus a
/// coding question for skills where one makes sense.
pub fn generate_sections(skills: &[String]) -> Vec<AssessmentSection> {
    skills
        .iter()
        .map(|skill| {
            let mut questions: Vec<AssessmentQuestion> = (1..=QUESTIONS_PER_SKILL)
                .map(|i| AssessmentQuestion {
                    question_type: QuestionType::MultipleChoice,
                    content: format!("Sample {skill} question {i}?"),
                    options: Some(
                        ["A", "B", "C", "D"]
                            .iter()
                            .map(|letter| format!("Option {letter} for {skill} question {i}"))
                            .collect(),
                    ),
                    correct_answer: Some(format!("Option A for {skill} question {i}")),
                })
                .collect();

            if CODING_SKILLS.contains(&skill.as_str()) {
                questions.push(AssessmentQuestion {
                    question_type: QuestionType::Coding,
                    content: format!("Write a function in {skill} that performs a simple task."),
                    options: None,
                    correct_answer: None,
                });
            }

            AssessmentSection {
                title: format!("{skill} Assessment"),
                questions,
                time_allowed_secs: SECTION_TIME_SECS,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_section_per_skill() {
        let sections = generate_sections(&["Rust".to_string(), "SQL".to_string()]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Rust Assessment");
        assert_eq!(sections[1].title, "SQL Assessment");
    }

    #[test]
    fn test_non_coding_skill_gets_five_multiple_choice() {
        let sections = generate_sections(&["SQL".to_string()]);
        let questions = &sections[0].questions;
        assert_eq!(questions.len(), 5);
        assert!(questions
            .iter()
            .all(|q| q.question_type == QuestionType::MultipleChoice));
        assert!(questions.iter().all(|q| q.options.as_ref().unwrap().len() == 4));
    }

    #[test]
    fn test_coding_skill_gets_extra_coding_question() {
        let sections = generate_sections(&["Python".to_string()]);
        let questions = &sections[0].questions;
        assert_eq!(questions.len(), 6);
        let coding = questions.last().unwrap();
        assert_eq!(coding.question_type, QuestionType::Coding);
        assert!(coding.options.is_none());
        assert!(coding.correct_answer.is_none());
    }

    #[test]
    fn test_section_time_allowance() {
        let sections = generate_sections(&["Rust".to_string()]);
        assert_eq!(sections[0].time_allowed_secs, 1800);
    }

    #[test]
    fn test_no_skills_yields_no_sections() {
        assert!(generate_sections(&[]).is_empty());
    }

    #[test]
    fn test_question_serializes_with_type_tag() {
        let sections = generate_sections(&["JavaScript".to_string()]);
        let json = serde_json::to_value(&sections[0].questions[0]).unwrap();
        assert_eq!(json["type"], "MULTIPLE_CHOICE");
        let json = serde_json::to_value(sections[0].questions.last().unwrap()).unwrap();
        assert_eq!(json["type"], "CODING");
    }
}

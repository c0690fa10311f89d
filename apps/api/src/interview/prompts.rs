// All LLM prompt constants for interview evaluation.

/// System prompt for transcript scoring — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an expert hiring manager evaluating interview responses. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Transcript analysis prompt template.
/// Replace `{transcript}` and `{questions}` (the questions rendered as a
/// 1-based numbered list) before sending.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are evaluating a job candidate. Below is the transcript of an interview.
Analyze the candidate's responses to the following questions and rate each answer on a scale of 1-100.
Also provide a brief feedback for each answer (1-2 sentences).

Interview Transcript:
{transcript}

Questions to evaluate:
{questions}

Finally, give an overall evaluation score from 1-5 where:
1 - Not selected
2-3 - On hold
4 - Selected but requires additional interview
5 - Selected

Return a JSON object with this EXACT schema (no extra fields):
{
  "questionScores": [
    {
      "questionId": 1,
      "score": 75,
      "feedback": "Good understanding of concepts but lacked specific examples."
    }
  ],
  "overallScore": 3,
  "overallFeedback": "Candidate shows promise but needs more technical depth."
}

HARD RULES:
1. Include EXACTLY one entry in `questionScores` per question, in order
2. `questionId` is the question's number in the list above
3. `score` must be an integer between 0 and 100
4. `overallScore` must be an integer between 1 and 5
5. Base every score ONLY on what the candidate actually said in the transcript"#;

/// Renders the rubric questions as a 1-based numbered list for the prompt.
pub fn enumerate_questions(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the full analysis prompt for a transcript and question list.
pub fn build_analysis_prompt(transcript: &str, questions: &[String]) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{transcript}", transcript)
        .replace("{questions}", &enumerate_questions(questions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_questions_is_one_based() {
        let questions = vec!["First?".to_string(), "Second?".to_string()];
        assert_eq!(enumerate_questions(&questions), "1. First?\n2. Second?");
    }

    #[test]
    fn test_build_prompt_substitutes_both_placeholders() {
        let prompt = build_analysis_prompt("the transcript body", &["Only question?".to_string()]);
        assert!(prompt.contains("the transcript body"));
        assert!(prompt.contains("1. Only question?"));
        assert!(!prompt.contains("{transcript}"));
        assert!(!prompt.contains("{questions}"));
    }
}

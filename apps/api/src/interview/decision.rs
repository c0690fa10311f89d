//! Decision mapping — overall score to categorical hiring outcome.

use crate::interview::models::{Decision, OverallScore};

/// Maps a validated 1–5 overall score to a hiring decision.
///
/// | score | decision |
/// |---|---|
/// | 1 | NOT_SELECTED |
/// | 2, 3 | ON_HOLD |
/// | 4 | ADDITIONAL_INTERVIEW_REQUIRED |
/// | 5 | SELECTED |
pub fn decision_for(score: OverallScore) -> Decision {
    match score.get() {
        1 => Decision::NotSelected,
        2 | 3 => Decision::OnHold,
        4 => Decision::AdditionalInterviewRequired,
        // OverallScore construction guarantees the range 1–5.
        _ => Decision::Selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: i64) -> OverallScore {
        OverallScore::new(v).unwrap()
    }

    #[test]
    fn test_score_1_is_not_selected() {
        assert_eq!(decision_for(score(1)), Decision::NotSelected);
    }

    #[test]
    fn test_scores_2_and_3_are_on_hold() {
        assert_eq!(decision_for(score(2)), Decision::OnHold);
        assert_eq!(decision_for(score(3)), Decision::OnHold);
    }

    #[test]
    fn test_score_4_requires_additional_interview() {
        assert_eq!(decision_for(score(4)), Decision::AdditionalInterviewRequired);
    }

    #[test]
    fn test_score_5_is_selected() {
        assert_eq!(decision_for(score(5)), Decision::Selected);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum score, in percent, that counts as a pass.
pub const PASS_THRESHOLD: f64 = 70.0;

/// A quiz score in percent, rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Score(f64);

impl Score {
    /// Score from answered-correct over total correct-option slots.
    ///
    /// Zero total slots (an empty quiz) yields zero rather than an error.
    #[must_use]
    pub fn from_ratio(correct_answered: usize, total_correct: usize) -> Self {
        if total_correct == 0 {
            return Self(0.0);
        }
        #[allow(clippy::cast_precision_loss)]
        let raw = (correct_answered as f64 / total_correct as f64) * 100.0;
        Self(round2(raw.max(0.0)))
    }

    /// Rebuild a score from an already-computed percentage.
    ///
    /// Values are clamped to `0..=100` and re-rounded, so persisted values
    /// can be trusted after the round trip.
    #[must_use]
    pub fn from_percent(value: f64) -> Self {
        Self(round2(value.clamp(0.0, 100.0)))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Pass/fail determination; pure function of the score.
    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.0 >= PASS_THRESHOLD
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Data for the end-of-quiz result dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptOutcome {
    pub attempt_number: u32,
    pub score: Score,
    pub passed: bool,
}

impl AttemptOutcome {
    #[must_use]
    pub fn new(attempt_number: u32, score: Score) -> Self {
        Self {
            attempt_number,
            score,
            passed: score.is_passing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        let score = Score::from_ratio(2, 3);
        assert!((score.value() - 66.67).abs() < f64::EPSILON);
        assert!(!score.is_passing());
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let score = Score::from_ratio(0, 0);
        assert!((score.value() - 0.0).abs() < f64::EPSILON);
        assert!(!score.is_passing());
    }

    #[test]
    fn full_marks_pass() {
        let score = Score::from_ratio(3, 3);
        assert!((score.value() - 100.0).abs() < f64::EPSILON);
        assert!(score.is_passing());
    }

    #[test]
    fn threshold_is_inclusive() {
        let score = Score::from_percent(70.0);
        assert!(score.is_passing());

        let below = Score::from_percent(69.99);
        assert!(!below.is_passing());
    }

    #[test]
    fn percent_values_are_clamped() {
        assert!((Score::from_percent(140.0).value() - 100.0).abs() < f64::EPSILON);
        assert!((Score::from_percent(-3.0).value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn outcome_carries_pass_label() {
        let outcome = AttemptOutcome::new(2, Score::from_ratio(9, 10));
        assert_eq!(outcome.attempt_number, 2);
        assert!(outcome.passed);

        let failing = AttemptOutcome::new(3, Score::from_ratio(2, 3));
        assert!(!failing.passed);
    }

    #[test]
    fn display_keeps_two_decimals() {
        assert_eq!(Score::from_ratio(2, 3).to_string(), "66.67");
        assert_eq!(Score::from_ratio(1, 2).to_string(), "50.00");
    }
}

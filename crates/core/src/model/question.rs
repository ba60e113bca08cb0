use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question content cannot be empty")]
    EmptyContent,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("expected correct count must be >= 1, got {0}")]
    InvalidCorrectCount(u32),

    #[error("expected correct count {expected} exceeds option count {options}")]
    CorrectCountExceedsOptions { expected: u32, options: usize },

    #[error("expected correct count {expected} does not match flagged options {flagged}")]
    CorrectCountMismatch { expected: u32, flagged: usize },

    #[error("duplicate option id {0} within question")]
    DuplicateOption(OptionId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetError {
    #[error("invalid question at index {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("option id {0} appears in more than one question")]
    DuplicateOptionAcrossQuestions(OptionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One selectable answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub label: String,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, label: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            label: label.into(),
            is_correct,
        }
    }
}

/// Unvalidated question shape, as it arrives from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub content: String,
    pub num_correct: u32,
    pub options: Vec<AnswerOption>,
}

impl QuestionDraft {
    /// Validate the draft into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the content is empty, the option set is
    /// empty or carries duplicate ids, or the expected correct count
    /// disagrees with the option flags.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.content.trim().is_empty() {
            return Err(QuestionError::EmptyContent);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if self.num_correct == 0 {
            return Err(QuestionError::InvalidCorrectCount(self.num_correct));
        }
        let expected = usize::try_from(self.num_correct).unwrap_or(usize::MAX);
        if expected > self.options.len() {
            return Err(QuestionError::CorrectCountExceedsOptions {
                expected: self.num_correct,
                options: self.options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.id) {
                return Err(QuestionError::DuplicateOption(option.id));
            }
        }

        let flagged = self.options.iter().filter(|o| o.is_correct).count();
        if flagged != expected {
            return Err(QuestionError::CorrectCountMismatch {
                expected: self.num_correct,
                flagged,
            });
        }

        Ok(Question {
            id: self.id,
            content: self.content,
            num_correct: self.num_correct,
            options: self.options,
        })
    }
}

/// A validated quiz question. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    content: String,
    num_correct: u32,
    options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of options that must be selected to fully answer this question.
    #[must_use]
    pub fn num_correct(&self) -> u32 {
        self.num_correct
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Ids of the options flagged correct, in display order.
    pub fn correct_option_ids(&self) -> impl Iterator<Item = OptionId> + '_ {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
    }

    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|o| o.id == id)
    }
}

//
// ─── QUIZ SHEET ────────────────────────────────────────────────────────────────
//

/// The loaded question set for one assessment session.
///
/// A sheet with zero questions is valid; scoring such a sheet yields zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSheet {
    attempt_number: u32,
    questions: Vec<Question>,
}

impl QuizSheet {
    /// Build a sheet from validated questions.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::DuplicateOptionAcrossQuestions` if an option id
    /// is shared between questions. Option ids must be globally unique so
    /// the derived set of all correct ids stays unambiguous.
    pub fn new(attempt_number: u32, questions: Vec<Question>) -> Result<Self, SheetError> {
        let mut seen = HashSet::new();
        for question in &questions {
            for option in question.options() {
                if !seen.insert(option.id) {
                    return Err(SheetError::DuplicateOptionAcrossQuestions(option.id));
                }
            }
        }
        Ok(Self {
            attempt_number,
            questions,
        })
    }

    /// Build a sheet straight from drafts, validating each question.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::Question` for the first invalid draft, or
    /// `SheetError::DuplicateOptionAcrossQuestions` for cross-question id
    /// collisions.
    pub fn from_drafts(
        attempt_number: u32,
        drafts: Vec<QuestionDraft>,
    ) -> Result<Self, SheetError> {
        let mut questions = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.into_iter().enumerate() {
            let question = draft
                .validate()
                .map_err(|source| SheetError::Question { index, source })?;
            questions.push(question);
        }
        Self::new(attempt_number, questions)
    }

    /// Sequential attempt number for this user/chapter, display only.
    #[must_use]
    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Total number of correct-option slots across the whole sheet.
    #[must_use]
    pub fn total_correct_slots(&self) -> usize {
        self.questions
            .iter()
            .map(|q| q.correct_option_ids().count())
            .sum()
    }

    /// Apply a caller-supplied shuffle to each question's option display
    /// order. Correctness flags travel with their options, so scoring is
    /// unaffected.
    pub fn shuffle_options_with<F>(&mut self, mut shuffle: F)
    where
        F: FnMut(&mut Vec<AnswerOption>),
    {
        for question in &mut self.questions {
            shuffle(&mut question.options);
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: u64, num_correct: u32, options: Vec<AnswerOption>) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(id),
            content: format!("Question {id}"),
            num_correct,
            options,
        }
    }

    fn option(id: u64, is_correct: bool) -> AnswerOption {
        AnswerOption::new(OptionId::new(id), format!("Option {id}"), is_correct)
    }

    #[test]
    fn validates_well_formed_question() {
        let q = draft(1, 2, vec![option(1, true), option(2, true), option(3, false)])
            .validate()
            .unwrap();

        assert_eq!(q.num_correct(), 2);
        assert_eq!(
            q.correct_option_ids().collect::<Vec<_>>(),
            vec![OptionId::new(1), OptionId::new(2)]
        );
    }

    #[test]
    fn rejects_empty_content() {
        let mut d = draft(1, 1, vec![option(1, true)]);
        d.content = "   ".into();
        assert_eq!(d.validate().unwrap_err(), QuestionError::EmptyContent);
    }

    #[test]
    fn rejects_zero_correct_count() {
        let err = draft(1, 0, vec![option(1, true)]).validate().unwrap_err();
        assert_eq!(err, QuestionError::InvalidCorrectCount(0));
    }

    #[test]
    fn rejects_correct_count_above_option_count() {
        let err = draft(1, 3, vec![option(1, true), option(2, true)])
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectCountExceedsOptions { expected: 3, options: 2 }
        ));
    }

    #[test]
    fn rejects_flag_count_disagreement() {
        let err = draft(1, 1, vec![option(1, true), option(2, true)])
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectCountMismatch { expected: 1, flagged: 2 }
        ));
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let err = draft(1, 1, vec![option(7, true), option(7, false)])
            .validate()
            .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption(OptionId::new(7)));
    }

    #[test]
    fn sheet_accepts_zero_questions() {
        let sheet = QuizSheet::new(1, Vec::new()).unwrap();
        assert!(sheet.is_empty());
        assert_eq!(sheet.total_correct_slots(), 0);
    }

    #[test]
    fn sheet_rejects_cross_question_option_collision() {
        let q1 = draft(1, 1, vec![option(1, true), option(2, false)])
            .validate()
            .unwrap();
        let q2 = draft(2, 1, vec![option(2, true)]).validate().unwrap();

        let err = QuizSheet::new(1, vec![q1, q2]).unwrap_err();
        assert_eq!(
            err,
            SheetError::DuplicateOptionAcrossQuestions(OptionId::new(2))
        );
    }

    #[test]
    fn sheet_counts_correct_slots() {
        let q1 = draft(1, 1, vec![option(1, true), option(2, false)])
            .validate()
            .unwrap();
        let q2 = draft(2, 2, vec![option(3, true), option(4, true), option(5, false)])
            .validate()
            .unwrap();

        let sheet = QuizSheet::new(3, vec![q1, q2]).unwrap();
        assert_eq!(sheet.total_correct_slots(), 3);
        assert_eq!(sheet.attempt_number(), 3);
    }

    #[test]
    fn sheet_reports_first_invalid_draft() {
        let drafts = vec![
            draft(1, 1, vec![option(1, true)]),
            draft(2, 0, vec![option(2, true)]),
        ];
        let err = QuizSheet::from_drafts(1, drafts).unwrap_err();
        assert!(matches!(err, SheetError::Question { index: 1, .. }));
    }
}

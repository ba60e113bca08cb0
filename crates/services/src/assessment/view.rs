use edupath_core::model::{AttemptOutcome, OptionId};

use super::engine::AssessmentSession;

/// Remaining time as `MM:SS` for the quiz header.
///
/// Minutes saturate at 99 so the display never widens.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    let capped = secs.min(99 * 60 + 59);
    format!("{:02}:{:02}", capped / 60, capped % 60)
}

/// One renderable answer option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: OptionId,
    pub label: String,
    pub selected: bool,
}

/// One renderable question with its selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub content: String,
    pub num_correct: u32,
    pub selected_count: usize,
    pub options: Vec<OptionView>,
}

/// Read-only projection of a session for the hosting screen.
///
/// Everything here is derived; rendering it cannot mutate the attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentView {
    pub attempt_number: u32,
    pub timer: String,
    pub is_submitted: bool,
    pub questions: Vec<QuestionView>,
    pub outcome: Option<AttemptOutcome>,
}

impl AssessmentView {
    #[must_use]
    pub fn from_session(session: &AssessmentSession) -> Self {
        let questions = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selection = session.selections(index);
                QuestionView {
                    content: question.content().to_owned(),
                    num_correct: question.num_correct(),
                    selected_count: selection.map_or(0, |s| s.len()),
                    options: question
                        .options()
                        .iter()
                        .map(|option| OptionView {
                            id: option.id,
                            label: option.label.clone(),
                            selected: selection.is_some_and(|s| s.contains(option.id)),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            attempt_number: session.attempt_number(),
            timer: format_remaining(session.remaining_secs()),
            is_submitted: session.is_submitted(),
            questions,
            outcome: session.outcome(),
        }
    }
}

/// Aggregated view of assessment progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentProgress {
    pub total_questions: usize,
    /// Questions with at least one option selected.
    pub answered_questions: usize,
    pub remaining_secs: u32,
    pub is_submitted: bool,
}

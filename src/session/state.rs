use crate::engine::lifeline::Lifelines;
use crate::session::question::{DisplayedQuestion, OPTION_COUNT};

/// A missed question, kept with the option order the player saw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncorrectAttempt {
    pub question_text: String,
    pub displayed_options: [String; OPTION_COUNT],
    pub correct_display_index: usize,
}

impl IncorrectAttempt {
    pub fn correct_option(&self) -> &str {
        &self.displayed_options[self.correct_display_index]
    }
}

impl From<&DisplayedQuestion> for IncorrectAttempt {
    fn from(question: &DisplayedQuestion) -> Self {
        Self {
            question_text: question.text.clone(),
            displayed_options: question.options.clone(),
            correct_display_index: question.correct,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub score: i32,
    pub streak: u32,
    pub timer_seconds: u64,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub used_question_indices: Vec<usize>,
    pub lifelines: Lifelines,
    pub review: Vec<IncorrectAttempt>,
}

impl SessionState {
    pub fn new(timer_seconds: u64) -> Self {
        Self {
            timer_seconds,
            ..Self::default()
        }
    }

    /// Back to a fresh session with all lifelines re-armed.
    pub fn reset(&mut self) {
        *self = Self::new(self.timer_seconds);
    }

    pub fn is_used(&self, index: usize) -> bool {
        self.used_question_indices.contains(&index)
    }

    /// Returns false if the index was already consumed.
    pub fn mark_used(&mut self, index: usize) -> bool {
        if self.is_used(index) {
            return false;
        }
        self.used_question_indices.push(index);
        true
    }
}

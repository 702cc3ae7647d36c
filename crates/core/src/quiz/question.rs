use serde::{Deserialize, Serialize};

use crate::model::Card;

/// One multiple-choice question derived from a card.
///
/// `options` holds the card's definition once plus the distractors, in
/// display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    card: Card,
    options: Vec<String>,
    selected_answer: Option<String>,
}

impl Question {
    pub(crate) fn new(card: Card, options: Vec<String>) -> Self {
        Self {
            card,
            options,
            selected_answer: None,
        }
    }

    #[must_use]
    pub fn card(&self) -> &Card {
        &self.card
    }

    /// The card's term, shown as the prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        self.card.term()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        self.card.definition()
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected_answer.as_deref()
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.selected_answer.is_some()
    }

    /// `None` until answered.
    #[must_use]
    pub fn is_correct(&self) -> Option<bool> {
        self.selected_answer
            .as_deref()
            .map(|answer| answer == self.correct_answer())
    }

    pub(crate) fn record(&mut self, answer: String) -> bool {
        let correct = answer == self.correct_answer();
        self.selected_answer = Some(answer);
        correct
    }
}

/// What the caller learns right after submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
    /// Score after this answer.
    pub score: usize,
}

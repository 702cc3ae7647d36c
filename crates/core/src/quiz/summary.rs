use serde::{Deserialize, Serialize};

use crate::model::percent;

use super::PASS_THRESHOLD_PERCENT;
use super::question::Question;

/// Per-question line of a quiz summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub term: String,
    pub correct_answer: String,
    pub selected_answer: Option<String>,
    pub is_correct: bool,
}

/// Results of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    /// `100 * score / total`, rounded.
    pub percentage: u32,
    /// `percentage >= PASS_THRESHOLD_PERCENT`.
    pub passed: bool,
    pub results: Vec<QuestionResult>,
}

impl QuizSummary {
    pub(crate) fn from_questions(questions: &[Question], score: usize) -> Self {
        let results = questions
            .iter()
            .map(|q| QuestionResult {
                term: q.prompt().to_owned(),
                correct_answer: q.correct_answer().to_owned(),
                selected_answer: q.selected_answer().map(ToOwned::to_owned),
                is_correct: q.is_correct().unwrap_or(false),
            })
            .collect();
        Self::from_parts(score, questions.len(), results)
    }

    fn from_parts(score: usize, total: usize, results: Vec<QuestionResult>) -> Self {
        let percentage = percent(score, total);
        Self {
            score,
            total,
            percentage,
            passed: percentage >= PASS_THRESHOLD_PERCENT,
            results,
        }
    }

    /// Questions answered incorrectly, in quiz order.
    pub fn missed(&self) -> impl Iterator<Item = &QuestionResult> {
        self.results.iter().filter(|r| !r.is_correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_of_five_passes_at_eighty_percent() {
        let summary = QuizSummary::from_parts(4, 5, Vec::new());
        assert_eq!(summary.percentage, 80);
        assert!(summary.passed);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(QuizSummary::from_parts(7, 10, Vec::new()).passed);
        assert!(!QuizSummary::from_parts(6, 10, Vec::new()).passed);
        // 2/3 rounds to 67
        assert!(!QuizSummary::from_parts(2, 3, Vec::new()).passed);
    }

    #[test]
    fn missed_lists_incorrect_results() {
        let results = vec![
            QuestionResult {
                term: "Power Rule".into(),
                correct_answer: "nx^(n-1)".into(),
                selected_answer: Some("nx^(n-1)".into()),
                is_correct: true,
            },
            QuestionResult {
                term: "Chain Rule".into(),
                correct_answer: "f'(g(x)) g'(x)".into(),
                selected_answer: Some("f'(x) g(x)".into()),
                is_correct: false,
            },
        ];
        let summary = QuizSummary::from_parts(1, 2, results);
        let missed: Vec<&str> = summary.missed().map(|r| r.term.as_str()).collect();
        assert_eq!(missed, vec!["Chain Rule"]);
        assert_eq!(summary.percentage, 50);
    }
}

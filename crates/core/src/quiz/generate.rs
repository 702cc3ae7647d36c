use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::Card;

use super::question::Question;
use super::size::QuizSize;
use super::{DISTRACTOR_COUNT, MIN_QUIZ_CARDS, OPTION_COUNT, QuizError};

/// Builds the question list for a quiz over `cards`.
///
/// Cards are picked by a uniform shuffle of the whole set, then truncated to
/// the requested size, so every subset of that size is equally likely.
pub(crate) fn build_questions<R: Rng + ?Sized>(
    cards: &[Card],
    size: QuizSize,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    if cards.len() < MIN_QUIZ_CARDS {
        return Err(QuizError::InsufficientCards {
            required: MIN_QUIZ_CARDS,
            available: cards.len(),
        });
    }

    let mut order: Vec<usize> = (0..cards.len()).collect();
    order.shuffle(rng);
    order.truncate(size.resolve(cards.len()));

    Ok(order
        .into_iter()
        .map(|index| {
            let card = &cards[index];
            let mut options = Vec::with_capacity(OPTION_COUNT);
            options.push(card.definition().to_owned());
            options.extend(pick_distractors(cards, index, rng));
            options.shuffle(rng);
            Question::new(card.clone(), options)
        })
        .collect())
}

/// Draws wrong options from the definitions of every other card in the set.
///
/// Definitions that repeat the correct one, or each other, are only used when
/// the set has fewer than three distinct alternatives.
fn pick_distractors<R: Rng + ?Sized>(cards: &[Card], answer: usize, rng: &mut R) -> Vec<String> {
    let correct = cards[answer].definition();
    let mut seen: HashSet<&str> = HashSet::from([correct]);
    let mut distinct = Vec::new();
    let mut repeats = Vec::new();

    for (i, other) in cards.iter().enumerate() {
        if i == answer {
            continue;
        }
        let definition = other.definition();
        if seen.insert(definition) {
            distinct.push(definition);
        } else {
            repeats.push(definition);
        }
    }

    distinct.shuffle(rng);
    if distinct.len() < DISTRACTOR_COUNT {
        repeats.shuffle(rng);
        // stable: repeats of the correct answer go last
        repeats.sort_by_key(|d| *d == correct);
        distinct.extend(repeats);
    }

    distinct
        .into_iter()
        .take(DISTRACTOR_COUNT)
        .map(str::to_owned)
        .collect()
}

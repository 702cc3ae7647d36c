//! Flip-card study sessions.
//!
//! The learner walks through a set, flips each card and marks whether they
//! knew it. Marks become the cards' mastery flags when the session finishes.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::model::{Card, CardId, FlashcardSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudyError {
    #[error("cannot study an empty set")]
    EmptySet,
}

/// Aggregated view of study progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyProgress {
    /// 1-based number of the card on screen.
    pub position: usize,
    pub total: usize,
    pub viewed: usize,
    /// Cards currently marked known.
    pub mastered: usize,
    /// Cards currently marked for review.
    pub needs_review: usize,
}

/// In-memory study pass over one set.
#[derive(Debug, Clone)]
pub struct StudySession {
    set: FlashcardSet,
    cards: Vec<Card>,
    current: usize,
    flipped: bool,
    viewed: BTreeSet<usize>,
    /// Latest mark per card; re-marking replaces it, so
    /// `mastered + needs_review <= total`.
    marks: BTreeMap<CardId, bool>,
}

impl StudySession {
    /// Start at the first card in set order.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::EmptySet` if the set has no cards.
    pub fn new(set: &FlashcardSet) -> Result<Self, StudyError> {
        if set.cards().is_empty() {
            return Err(StudyError::EmptySet);
        }
        Ok(Self {
            set: set.clone(),
            cards: set.cards().to_vec(),
            current: 0,
            flipped: false,
            viewed: BTreeSet::from([0]),
            marks: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn current_card(&self) -> &Card {
        &self.cards[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Toggle between term and definition.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Mark the current card known or not, then move on unless it is the
    /// last card. Marking a card again replaces its earlier mark.
    pub fn mark(&mut self, knows: bool) {
        let card = &mut self.cards[self.current];
        card.set_mastered(knows);
        self.marks.insert(card.id().clone(), knows);
        self.next();
    }

    /// Move forward; returns false on the last card.
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.cards.len() {
            return false;
        }
        self.go_to(self.current + 1);
        true
    }

    /// Move back; returns false on the first card.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.go_to(self.current - 1);
        true
    }

    fn go_to(&mut self, index: usize) {
        self.current = index;
        self.flipped = false;
        self.viewed.insert(index);
    }

    /// Reorder the cards uniformly at random and start from the first one.
    ///
    /// Marks are kept.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
        self.current = 0;
        self.flipped = false;
        self.viewed = BTreeSet::from([0]);
    }

    /// Back to the first card with every card unmastered and marks cleared.
    pub fn restart(&mut self) {
        for card in &mut self.cards {
            card.set_mastered(false);
        }
        self.current = 0;
        self.flipped = false;
        self.viewed = BTreeSet::from([0]);
        self.marks.clear();
    }

    #[must_use]
    pub fn progress(&self) -> StudyProgress {
        let mastered = self.marks.values().filter(|knows| **knows).count();
        StudyProgress {
            position: self.current + 1,
            total: self.cards.len(),
            viewed: self.viewed.len(),
            mastered,
            needs_review: self.marks.len() - mastered,
        }
    }

    /// The source set with this session's mastery flags applied, in the
    /// set's original card order.
    #[must_use]
    pub fn finish(self) -> FlashcardSet {
        let Self { mut set, cards, .. } = self;
        let flags: BTreeMap<&CardId, bool> =
            cards.iter().map(|c| (c.id(), c.is_mastered())).collect();
        set.update_mastery(|card| flags.get(card.id()).copied());
        set
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::card::Card;
use crate::model::ids::{CardId, SectionId, SetId};

/// Longest accepted set title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Longest accepted set description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    #[error("set title cannot be empty")]
    EmptyTitle,

    #[error("set title must be {MAX_TITLE_CHARS} characters or less (got {len})")]
    TitleTooLong { len: usize },

    #[error("set description must be {MAX_DESCRIPTION_CHARS} characters or less (got {len})")]
    DescriptionTooLong { len: usize },

    #[error("duplicate card id in set: {0}")]
    DuplicateCard(CardId),

    #[error("card not found in set: {0}")]
    CardNotFound(CardId),
}

//
// ─── FLASHCARD SET ─────────────────────────────────────────────────────────────
//

/// A titled, ordered collection of cards belonging to a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    id: SetId,
    title: String,
    description: Option<String>,
    section_id: SectionId,
    cards: Vec<Card>,
    created_at: DateTime<Utc>,
    last_studied: Option<DateTime<Utc>>,
}

impl FlashcardSet {
    /// Creates an empty set.
    ///
    /// Title and description are trimmed; a blank description is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SetError` if the title is blank or either field is too long.
    pub fn new(
        id: SetId,
        title: impl Into<String>,
        description: Option<String>,
        section_id: SectionId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SetError> {
        let title = title.into();
        let title = title.trim();
        if title.is_empty() {
            return Err(SetError::EmptyTitle);
        }
        let title_len = title.chars().count();
        if title_len > MAX_TITLE_CHARS {
            return Err(SetError::TitleTooLong { len: title_len });
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        if let Some(desc) = &description {
            let len = desc.chars().count();
            if len > MAX_DESCRIPTION_CHARS {
                return Err(SetError::DescriptionTooLong { len });
            }
        }

        Ok(Self {
            id,
            title: title.to_owned(),
            description,
            section_id,
            cards: Vec::new(),
            created_at,
            last_studied: None,
        })
    }

    /// Builder-style variant of [`FlashcardSet::push_card`].
    ///
    /// # Errors
    ///
    /// Returns `SetError::DuplicateCard` if a card id repeats.
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Result<Self, SetError> {
        for card in cards {
            self.push_card(card)?;
        }
        Ok(self)
    }

    /// Appends a card.
    ///
    /// # Errors
    ///
    /// Returns `SetError::DuplicateCard` if the id is already present.
    pub fn push_card(&mut self, card: Card) -> Result<(), SetError> {
        if self.card(card.id()).is_some() {
            return Err(SetError::DuplicateCard(card.id().clone()));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Records that the set was studied or quizzed at `at`.
    pub fn mark_studied(&mut self, at: DateTime<Utc>) {
        self.last_studied = Some(at);
    }

    /// Builder-style variant of [`FlashcardSet::mark_studied`], used when
    /// rehydrating.
    #[must_use]
    pub fn with_last_studied(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.last_studied = at;
        self
    }

    /// Replaces the creation time, used when a store keeps the first one.
    #[must_use]
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Sets each card's mastery flag to `mark(card)`; `None` leaves it as is.
    pub fn update_mastery(&mut self, mut mark: impl FnMut(&Card) -> Option<bool>) {
        for card in &mut self.cards {
            if let Some(mastered) = mark(card) {
                card.set_mastered(mastered);
            }
        }
    }

    /// Sets the mastery flag of a card.
    ///
    /// # Errors
    ///
    /// Returns `SetError::CardNotFound` if no card has this id.
    pub fn set_mastered(&mut self, id: &CardId, mastered: bool) -> Result<(), SetError> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| SetError::CardNotFound(id.clone()))?;
        card.set_mastered(mastered);
        Ok(())
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &SetId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn section_id(&self) -> &SectionId {
        &self.section_id
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn last_studied(&self) -> Option<DateTime<Utc>> {
        self.last_studied
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn mastered_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_mastered()).count()
    }

    /// Share of mastered cards, rounded to a whole percent. Zero for an empty set.
    #[must_use]
    pub fn mastered_percentage(&self) -> u32 {
        percent(self.mastered_count(), self.cards.len())
    }

    #[must_use]
    pub fn has_code(&self) -> bool {
        self.cards.iter().any(Card::has_code)
    }

    #[must_use]
    pub fn has_math(&self) -> bool {
        self.cards.iter().any(Card::has_math)
    }
}

/// Rounds `part / whole` to a whole percentage; zero when `whole` is zero.
#[must_use]
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // half-up
    let scaled = (part as u128 * 200 + whole as u128) / (whole as u128 * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::content::{detect_code, detect_math};
use crate::model::ids::CardId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("card term cannot be empty")]
    EmptyTerm,

    #[error("card definition cannot be empty")]
    EmptyDefinition,
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A term/definition pair.
///
/// Term and definition are opaque text; `has_code` and `has_math` are hints
/// for presentation and are detected from the text on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    term: String,
    definition: String,
    has_code: bool,
    has_math: bool,
    mastered: bool,
}

impl Card {
    /// Creates an unmastered card, detecting code and math in either side.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if the term or definition is blank.
    pub fn new(
        id: CardId,
        term: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<Self, CardError> {
        let term = term.into();
        let definition = definition.into();
        if term.trim().is_empty() {
            return Err(CardError::EmptyTerm);
        }
        if definition.trim().is_empty() {
            return Err(CardError::EmptyDefinition);
        }

        let has_code = detect_code(&term) || detect_code(&definition);
        let has_math = detect_math(&term) || detect_math(&definition);

        Ok(Self {
            id,
            term,
            definition,
            has_code,
            has_math,
            mastered: false,
        })
    }

    /// Rehydrate a card from persisted storage, keeping stored flags as-is.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if the term or definition is blank.
    pub fn from_persisted(
        id: CardId,
        term: impl Into<String>,
        definition: impl Into<String>,
        has_code: bool,
        has_math: bool,
        mastered: bool,
    ) -> Result<Self, CardError> {
        let mut card = Self::new(id, term, definition)?;
        card.has_code = has_code;
        card.has_math = has_math;
        card.mastered = mastered;
        Ok(card)
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn has_code(&self) -> bool {
        self.has_code
    }

    #[must_use]
    pub fn has_math(&self) -> bool {
        self.has_math
    }

    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.mastered
    }

    pub fn set_mastered(&mut self, mastered: bool) {
        self.mastered = mastered;
    }

    /// Builder-style override of the code hint.
    #[must_use]
    pub fn with_code(mut self, has_code: bool) -> Self {
        self.has_code = has_code;
        self
    }

    /// Builder-style override of the math hint.
    #[must_use]
    pub fn with_math(mut self, has_math: bool) -> Self {
        self.has_math = has_math;
        self
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

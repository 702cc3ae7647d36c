use chrono::{DateTime, Utc};
use flashcards_core::model::{Card, CardId, FlashcardSet, SectionId, SetId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn bool_to_i64(v: bool) -> i64 {
    i64::from(v)
}

pub(crate) fn position_to_i64(position: usize) -> Result<i64, StorageError> {
    i64::try_from(position).map_err(|_| StorageError::Serialization("position overflow".into()))
}

/// Maps a `cards` row (without its set id).
pub(crate) fn map_card_row(row: &SqliteRow) -> Result<Card, StorageError> {
    let id = CardId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    Card::from_persisted(
        id,
        row.try_get::<String, _>("term").map_err(ser)?,
        row.try_get::<String, _>("definition").map_err(ser)?,
        row.try_get::<i64, _>("has_code").map_err(ser)? != 0,
        row.try_get::<i64, _>("has_math").map_err(ser)? != 0,
        row.try_get::<i64, _>("mastered").map_err(ser)? != 0,
    )
    .map_err(ser)
}

/// Maps a `sets` row and attaches its already-ordered cards.
pub(crate) fn map_set_row(row: &SqliteRow, cards: Vec<Card>) -> Result<FlashcardSet, StorageError> {
    let id = SetId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let section_id =
        SectionId::new(row.try_get::<String, _>("section_id").map_err(ser)?).map_err(ser)?;
    let last_studied: Option<DateTime<Utc>> = row.try_get("last_studied").map_err(ser)?;

    FlashcardSet::new(
        id,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        section_id,
        row.try_get("created_at").map_err(ser)?,
    )
    .and_then(|set| set.with_cards(cards))
    .map(|set| set.with_last_studied(last_studied))
    .map_err(ser)
}

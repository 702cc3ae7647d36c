use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flashcards_core::model::{Card, FlashcardSet, SetId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{bool_to_i64, map_card_row, map_set_row, position_to_i64, ser};
use crate::repository::{SetRepository, StorageError};

const SET_COLUMNS: &str = "id, title, description, section_id, created_at, last_studied";
const CARD_COLUMNS: &str = "set_id, id, position, term, definition, has_code, has_math, mastered";

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

impl SqliteRepository {
    async fn cards_for(&self, id: &SetId) -> Result<Vec<Card>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE set_id = ?1 ORDER BY position ASC"
        ))
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_card_row).collect()
    }
}

#[async_trait::async_trait]
impl SetRepository for SqliteRepository {
    async fn upsert_set(&self, set: &FlashcardSet) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO sets (id, title, description, section_id, created_at, last_studied)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                -- created_at stays as first inserted
                title = excluded.title,
                description = excluded.description,
                section_id = excluded.section_id,
                last_studied = excluded.last_studied
            ",
        )
        .bind(set.id().as_str())
        .bind(set.title())
        .bind(set.description())
        .bind(set.section_id().as_str())
        .bind(set.created_at())
        .bind(set.last_studied())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Cards are replaced wholesale so removed cards and reorders persist.
        sqlx::query("DELETE FROM cards WHERE set_id = ?1")
            .bind(set.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, card) in set.cards().iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO cards (set_id, id, position, term, definition, has_code, has_math, mastered)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .bind(set.id().as_str())
            .bind(card.id().as_str())
            .bind(position_to_i64(position)?)
            .bind(card.term())
            .bind(card.definition())
            .bind(bool_to_i64(card.has_code()))
            .bind(bool_to_i64(card.has_math()))
            .bind(bool_to_i64(card.is_mastered()))
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
                _ => conn(e),
            })?;
        }

        tx.commit().await.map_err(conn)?;
        log::debug!("stored set {} with {} cards", set.id(), set.card_count());
        Ok(())
    }

    async fn get_set(&self, id: &SetId) -> Result<Option<FlashcardSet>, StorageError> {
        let row = sqlx::query(&format!("SELECT {SET_COLUMNS} FROM sets WHERE id = ?1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let cards = self.cards_for(id).await?;
                map_set_row(&row, cards).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_sets(&self) -> Result<Vec<FlashcardSet>, StorageError> {
        let set_rows = sqlx::query(&format!(
            "SELECT {SET_COLUMNS} FROM sets ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let card_rows = sqlx::query(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY set_id ASC, position ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut cards_by_set: HashMap<String, Vec<Card>> = HashMap::new();
        for row in &card_rows {
            let set_id: String = row.try_get("set_id").map_err(ser)?;
            cards_by_set
                .entry(set_id)
                .or_default()
                .push(map_card_row(row)?);
        }

        let mut sets = Vec::with_capacity(set_rows.len());
        for row in &set_rows {
            let id: String = row.try_get("id").map_err(ser)?;
            let cards = cards_by_set.remove(&id).unwrap_or_default();
            sets.push(map_set_row(row, cards)?);
        }
        Ok(sets)
    }

    async fn mark_studied(&self, id: &SetId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE sets SET last_studied = ?1 WHERE id = ?2")
            .bind(at)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use flashcards_core::model::{FlashcardSet, SetId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for flashcard sets.
///
/// A set is stored and loaded as a whole, cards included, in card order.
#[async_trait]
pub trait SetRepository: Send + Sync {
    /// Persist or replace a set and its cards. Replacing keeps the
    /// stored `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be stored.
    async fn upsert_set(&self, set: &FlashcardSet) -> Result<(), StorageError>;

    /// Fetch a set by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend or decoding failures.
    async fn get_set(&self, id: &SetId) -> Result<Option<FlashcardSet>, StorageError>;

    /// All sets, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for backend or decoding failures.
    async fn list_sets(&self) -> Result<Vec<FlashcardSet>, StorageError>;

    /// Stamp `last_studied` on a set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set does not exist.
    async fn mark_studied(&self, id: &SetId, at: DateTime<Utc>) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sets: Arc<Mutex<HashMap<SetId, FlashcardSet>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SetRepository for InMemoryRepository {
    async fn upsert_set(&self, set: &FlashcardSet) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        // created_at stays as first inserted
        let stored = match guard.get(set.id()) {
            Some(existing) => set.clone().with_created_at(existing.created_at()),
            None => set.clone(),
        };
        guard.insert(set.id().clone(), stored);
        Ok(())
    }

    async fn get_set(&self, id: &SetId) -> Result<Option<FlashcardSet>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn list_sets(&self) -> Result<Vec<FlashcardSet>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut sets: Vec<FlashcardSet> = guard.values().cloned().collect();
        sets.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(sets)
    }

    async fn mark_studied(&self, id: &SetId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let set = guard.get_mut(id).ok_or(StorageError::NotFound)?;
        set.mark_studied(at);
        Ok(())
    }
}

/// Holds the set repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sets: Arc<dyn SetRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sets: Arc<dyn SetRepository> = Arc::new(InMemoryRepository::new());
        Self { sets }
    }
}

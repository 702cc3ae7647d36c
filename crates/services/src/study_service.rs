use std::sync::Arc;

use flashcards_core::model::{FlashcardSet, SetId};
use flashcards_core::study::StudySession;
use storage::repository::SetRepository;

use crate::Clock;
use crate::error::StudyServiceError;
use crate::rng::SharedRng;

/// Runs flip-card study passes and persists the resulting mastery.
#[derive(Clone)]
pub struct StudyService {
    clock: Clock,
    sets: Arc<dyn SetRepository>,
    rng: SharedRng,
}

impl StudyService {
    #[must_use]
    pub fn new(clock: Clock, sets: Arc<dyn SetRepository>) -> Self {
        Self {
            clock,
            sets,
            rng: SharedRng::from_os(),
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SharedRng::seeded(seed);
        self
    }

    /// Open a study pass over the stored set, optionally shuffled.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::SetNotFound` if the set does not exist.
    /// Returns `StudyServiceError::Study` if the set has no cards.
    /// Returns `StudyServiceError::Storage` if repository access fails.
    pub async fn start_study(
        &self,
        set_id: &SetId,
        shuffle: bool,
    ) -> Result<StudySession, StudyServiceError> {
        let set = self
            .sets
            .get_set(set_id)
            .await?
            .ok_or_else(|| StudyServiceError::SetNotFound(set_id.clone()))?;
        let mut session = StudySession::new(&set)?;
        if shuffle {
            self.shuffle(&mut session);
        }
        log::info!("started study on set {set_id} ({} cards)", set.card_count());
        Ok(session)
    }

    /// Reshuffle a running session with this service's random source.
    pub fn shuffle(&self, session: &mut StudySession) {
        self.rng.with(|rng| session.shuffle(rng));
    }

    /// Persist the session's mastery marks and stamp the set as studied.
    ///
    /// The stored set is replaced by the session's snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Storage` if persistence fails.
    pub async fn finish_study(
        &self,
        session: StudySession,
    ) -> Result<FlashcardSet, StudyServiceError> {
        let mut set = session.finish();
        set.mark_studied(self.clock.now());
        self.sets.upsert_set(&set).await?;
        log::info!(
            "finished study on set {}: {}/{} mastered",
            set.id(),
            set.mastered_count(),
            set.card_count()
        );
        Ok(set)
    }
}

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use flashcards_core::model::{FlashcardSet, Section, SectionId, default_sections};
use storage::repository::SetRepository;

use crate::error::LibraryServiceError;

/// One section with the sets filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOverview {
    pub section: Section,
    pub sets: Vec<FlashcardSet>,
}

impl SectionOverview {
    /// Card count across every set in the section.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.sets.iter().map(FlashcardSet::card_count).sum()
    }
}

/// Totals across the whole library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub sets: usize,
    pub cards: usize,
    /// Sets whose `last_studied` lies within the 24 hours before `now`.
    pub studied_today: usize,
    pub mastered: usize,
}

impl LibraryStats {
    #[must_use]
    pub fn from_sets(sets: &[FlashcardSet], now: DateTime<Utc>) -> Self {
        let studied_today = sets
            .iter()
            .filter_map(FlashcardSet::last_studied)
            .filter(|at| {
                let age = now - *at;
                age >= Duration::zero() && age < Duration::days(1)
            })
            .count();
        Self {
            sets: sets.len(),
            cards: sets.iter().map(FlashcardSet::card_count).sum(),
            studied_today,
            mastered: sets.iter().map(FlashcardSet::mastered_count).sum(),
        }
    }
}

/// Case-insensitive match on title or description; a blank query matches
/// every set.
fn matches_query(set: &FlashcardSet, needle: &str) -> bool {
    needle.is_empty()
        || set.title().to_lowercase().contains(needle)
        || set
            .description()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Read-side access to the stored library.
#[derive(Clone)]
pub struct LibraryService {
    sets: Arc<dyn SetRepository>,
}

impl LibraryService {
    #[must_use]
    pub fn new(sets: Arc<dyn SetRepository>) -> Self {
        Self { sets }
    }

    /// All sets, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `LibraryServiceError::Storage` if repository access fails.
    pub async fn list_sets(&self) -> Result<Vec<FlashcardSet>, LibraryServiceError> {
        Ok(self.sets.list_sets().await?)
    }

    /// Sets grouped by the default sections, in section order.
    ///
    /// Sets pointing at an unknown section are filed as uncategorized.
    /// Sections without sets are still listed.
    ///
    /// # Errors
    ///
    /// Returns `LibraryServiceError::Storage` if repository access fails.
    pub async fn sections_overview(&self) -> Result<Vec<SectionOverview>, LibraryServiceError> {
        let sets = self.sets.list_sets().await?;
        Ok(group_by_section(sets))
    }

    /// Like [`LibraryService::sections_overview`], keeping only sets whose
    /// title or description contains `query`, ignoring case.
    ///
    /// While the query is non-blank, sections without matches are left out.
    ///
    /// # Errors
    ///
    /// Returns `LibraryServiceError::Storage` if repository access fails.
    pub async fn search(&self, query: &str) -> Result<Vec<SectionOverview>, LibraryServiceError> {
        let needle = query.trim().to_lowercase();
        let sets = self
            .sets
            .list_sets()
            .await?
            .into_iter()
            .filter(|set| matches_query(set, &needle))
            .collect();
        let mut overview = group_by_section(sets);
        if !needle.is_empty() {
            overview.retain(|o| !o.sets.is_empty());
        }
        log::debug!("search {query:?} matched {} sections", overview.len());
        Ok(overview)
    }

    /// Totals over every stored set, with "today" measured back from `now`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryServiceError::Storage` if repository access fails.
    pub async fn library_stats(
        &self,
        now: DateTime<Utc>,
    ) -> Result<LibraryStats, LibraryServiceError> {
        let sets = self.sets.list_sets().await?;
        Ok(LibraryStats::from_sets(&sets, now))
    }
}

fn group_by_section(sets: Vec<FlashcardSet>) -> Vec<SectionOverview> {
    let mut overview: Vec<SectionOverview> = default_sections()
        .into_iter()
        .map(|section| SectionOverview {
            section,
            sets: Vec::new(),
        })
        .collect();
    let fallback = SectionId::uncategorized();

    for set in sets {
        let slot = overview
            .iter()
            .position(|o| &o.section.id == set.section_id())
            .or_else(|| overview.iter().position(|o| o.section.id == fallback));
        match slot {
            Some(i) => overview[i].sets.push(set),
            None => log::warn!("no section for set {}", set.id()),
        }
    }
    overview
}

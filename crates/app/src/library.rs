use std::error::Error;
use std::io::Write;

use chrono::{DateTime, Utc};
use flashcards_core::model::FlashcardSet;
use services::{LibraryService, LibraryStats};

fn describe(set: &FlashcardSet) -> String {
    let mut line = format!(
        "{:<6} {}  ({} cards, {}% mastered",
        set.id().as_str(),
        set.title(),
        set.card_count(),
        set.mastered_percentage()
    );
    if let Some(at) = set.last_studied() {
        line.push_str(&format!(", studied {}", at.format("%Y-%m-%d %H:%M")));
    }
    line.push(')');
    if set.has_code() {
        line.push_str(" [code]");
    }
    if set.has_math() {
        line.push_str(" [math]");
    }
    line
}

fn describe_stats(stats: &LibraryStats) -> String {
    format!(
        "{} sets, {} cards, {} studied today, {} mastered",
        stats.sets, stats.cards, stats.studied_today, stats.mastered
    )
}

/// Print library totals, then every section with its sets, optionally
/// narrowed to sets matching `search`.
pub(crate) async fn run(
    out: &mut impl Write,
    service: &LibraryService,
    search: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), Box<dyn Error>> {
    let stats = service.library_stats(now).await?;
    if stats.sets == 0 {
        writeln!(out, "No flashcard sets yet. Run the seed binary to add samples.")?;
        return Ok(());
    }
    writeln!(out, "{}\n", describe_stats(&stats))?;

    let overview = match search {
        Some(query) => service.search(query).await?,
        None => service.sections_overview().await?,
    };
    if overview.iter().all(|o| o.sets.is_empty()) {
        writeln!(out, "No sets match {:?}.", search.unwrap_or_default())?;
        return Ok(());
    }

    for entry in overview.iter().filter(|o| !o.sets.is_empty()) {
        writeln!(
            out,
            "{} ({} sets, {} cards)",
            entry.section.name,
            entry.sets.len(),
            entry.card_count()
        )?;
        for set in &entry.sets {
            writeln!(out, "  {}", describe(set))?;
            if let Some(description) = set.description() {
                writeln!(out, "         {description}")?;
            }
        }
    }
    Ok(())
}

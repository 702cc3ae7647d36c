use std::error::Error;
use std::io::{BufRead, Write};

use flashcards_core::model::SetId;
use flashcards_core::study::StudySession;
use services::StudyService;

use crate::console::Console;

const HELP: &str = "f flip, k knew it, r review, n next, p previous, s shuffle, 0 restart, q finish";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Flip,
    Knew,
    Review,
    Next,
    Previous,
    Shuffle,
    Restart,
    Finish,
}

impl Action {
    fn from_input(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "f" | "" => Some(Self::Flip),
            "k" => Some(Self::Knew),
            "r" => Some(Self::Review),
            "n" => Some(Self::Next),
            "p" => Some(Self::Previous),
            "s" => Some(Self::Shuffle),
            "0" => Some(Self::Restart),
            "q" => Some(Self::Finish),
            _ => None,
        }
    }
}

/// Walk through a set card by card; mastery is saved on finish or end of
/// input.
pub(crate) async fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    service: &StudyService,
    set_id: &SetId,
    shuffle: bool,
) -> Result<(), Box<dyn Error>> {
    let mut session = service.start_study(set_id, shuffle).await?;
    writeln!(console.out(), "Commands: {HELP}")?;

    loop {
        show(console, &session)?;
        let Some(line) = console.prompt("Study")? else {
            break;
        };
        let Some(action) = Action::from_input(&line) else {
            writeln!(console.out(), "Commands: {HELP}")?;
            continue;
        };
        match action {
            Action::Flip => session.flip(),
            Action::Knew => session.mark(true),
            Action::Review => session.mark(false),
            Action::Next => {
                if !session.next() {
                    writeln!(console.out(), "Already at the last card.")?;
                }
            }
            Action::Previous => {
                if !session.previous() {
                    writeln!(console.out(), "Already at the first card.")?;
                }
            }
            Action::Shuffle => service.shuffle(&mut session),
            Action::Restart => session.restart(),
            Action::Finish => break,
        }
    }

    let set = service.finish_study(session).await?;
    writeln!(
        console.out(),
        "Saved {}: {}/{} mastered ({}%)",
        set.title(),
        set.mastered_count(),
        set.card_count(),
        set.mastered_percentage()
    )?;
    Ok(())
}

fn show<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &StudySession,
) -> Result<(), Box<dyn Error>> {
    let progress = session.progress();
    writeln!(
        console.out(),
        "\nCard {}/{} (viewed {}, knew {}, review {})",
        progress.position,
        progress.total,
        progress.viewed,
        progress.mastered,
        progress.needs_review
    )?;
    let card = session.current_card();
    if session.is_flipped() {
        writeln!(console.out(), "[definition]")?;
        console.print_text(card.definition(), "  ")?;
    } else {
        writeln!(console.out(), "[term]")?;
        console.print_text(card.term(), "  ")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use flashcards_core::Clock;
    use flashcards_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, SetRepository};
    use storage::samples::sample_sets;

    #[test]
    fn empty_input_flips() {
        assert_eq!(Action::from_input(""), Some(Action::Flip));
        assert_eq!(Action::from_input("K"), Some(Action::Knew));
        assert_eq!(Action::from_input("zz"), None);
    }

    #[tokio::test]
    async fn marks_are_saved_on_finish() {
        let repo = InMemoryRepository::new();
        let set = sample_sets(fixed_now()).unwrap().remove(0);
        repo.upsert_set(&set).await.unwrap();
        let service = StudyService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));

        let mut console = Console::new(Cursor::new(b"f\nk\nk\nr\nq\n".to_vec()), Vec::new());
        run(&mut console, &service, set.id(), false).await.unwrap();

        let stored = repo.get_set(set.id()).await.unwrap().unwrap();
        assert_eq!(stored.mastered_count(), 2);
        assert!(stored.cards()[0].is_mastered());
        assert!(!stored.cards()[2].is_mastered());
        assert_eq!(stored.last_studied(), Some(fixed_now()));
    }
}

use std::error::Error;
use std::io::{BufRead, Write};

use flashcards_core::model::SetId;
use flashcards_core::quiz::{QuizSession, QuizSize, QuizSummary};
use services::QuizService;

use crate::console::Console;

/// Letter shown next to the option at `index`.
fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .map_or('?', char::from)
}

/// Accepts a letter (`a`, `B`) or a 1-based number.
fn option_index(raw: &str, len: usize) -> Option<usize> {
    let raw = raw.trim();
    let index = match raw.parse::<usize>() {
        Ok(n) => n.checked_sub(1)?,
        Err(_) => {
            let mut chars = raw.chars();
            let c = chars.next()?.to_ascii_uppercase();
            if chars.next().is_some() || !c.is_ascii_uppercase() {
                return None;
            }
            usize::from(u8::try_from(c).ok()? - b'A')
        }
    };
    (index < len).then_some(index)
}

/// Run quiz attempts until the learner declines a retake.
pub(crate) async fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    service: &QuizService,
    set_id: &SetId,
    size: QuizSize,
) -> Result<(), Box<dyn Error>> {
    let mut session = service.start_quiz(set_id, size).await?;
    writeln!(
        console.out(),
        "Quiz: {} ({} questions)",
        session.set_title(),
        session.total()
    )?;
    let requested = session.requested_size();
    if !requested.fits(session.total()) {
        writeln!(
            console.out(),
            "Asked for {requested} questions; the set only has {}.",
            session.total()
        )?;
    }

    loop {
        if !play(console, &mut session)? {
            writeln!(console.out(), "Quiz abandoned; nothing recorded.")?;
            return Ok(());
        }
        let summary = service.complete_quiz(&session).await?;
        print_summary(console, &summary)?;

        match console.prompt("Retake? [y/N]")? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {
                session = service.retake(&session)?;
            }
            _ => return Ok(()),
        }
    }
}

/// Drive one attempt to completion. Returns false if the learner quit.
fn play<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut QuizSession,
) -> Result<bool, Box<dyn Error>> {
    while let Some(question) = session.current_question() {
        let progress = session.progress();
        writeln!(
            console.out(),
            "\nQuestion {}/{} ({}% done, score {})",
            progress.position,
            progress.total,
            progress.progress_percentage,
            progress.score
        )?;
        console.print_text(question.prompt(), "")?;
        let options = question.options().to_vec();
        for (i, option) in options.iter().enumerate() {
            writeln!(console.out(), "  {})", option_label(i))?;
            console.print_text(option, "     ")?;
        }

        let Some(line) = console.prompt("Answer (letter, q to quit)")? else {
            return Ok(false);
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(false);
        }
        let Some(index) = option_index(&line, options.len()) else {
            writeln!(
                console.out(),
                "Pick one of A-{}.",
                option_label(options.len().saturating_sub(1))
            )?;
            continue;
        };

        let feedback = session.submit_option(index)?;
        if feedback.correct {
            writeln!(console.out(), "Correct!")?;
        } else {
            writeln!(console.out(), "Incorrect. The answer was:")?;
            console.print_text(&feedback.correct_answer, "  ")?;
        }
        session.advance()?;
    }
    Ok(true)
}

fn print_summary<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    summary: &QuizSummary,
) -> Result<(), Box<dyn Error>> {
    let verdict = if summary.passed {
        "Passed"
    } else {
        "Keep practicing"
    };
    writeln!(
        console.out(),
        "\n{verdict}: {}/{} ({}%)",
        summary.score,
        summary.total,
        summary.percentage
    )?;
    for result in summary.missed() {
        writeln!(console.out(), "- {}", result.term)?;
        writeln!(
            console.out(),
            "  yours:   {}",
            result.selected_answer.as_deref().unwrap_or("(none)")
        )?;
        writeln!(console.out(), "  correct: {}", result.correct_answer)?;
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
    fn parses_letters_and_numbers() {
        assert_eq!(option_index("a", 4), Some(0));
        assert_eq!(option_index("D", 4), Some(3));
        assert_eq!(option_index("2", 4), Some(1));
        assert_eq!(option_index("e", 4), None);
        assert_eq!(option_index("0", 4), None);
        assert_eq!(option_index("ab", 4), None);
        assert_eq!(option_index("", 4), None);
    }

    #[tokio::test]
    async fn quitting_records_nothing() {
        let repo = InMemoryRepository::new();
        let set = sample_sets(fixed_now()).unwrap().remove(0);
        repo.upsert_set(&set).await.unwrap();
        let service = QuizService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()))
            .with_seed(1);

        let mut console = Console::new(Cursor::new(b"x\nq\n".to_vec()), Vec::new());
        run(&mut console, &service, set.id(), QuizSize::All)
            .await
            .unwrap();

        let stored = repo.get_set(set.id()).await.unwrap().unwrap();
        assert!(stored.last_studied().is_none());
    }

    #[tokio::test]
    async fn finished_quiz_is_recorded() {
        let repo = InMemoryRepository::new();
        let set = sample_sets(fixed_now()).unwrap().remove(1);
        repo.upsert_set(&set).await.unwrap();
        let service = QuizService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()))
            .with_seed(1);

        let answers = "a\n".repeat(set.card_count()) + "n\n";
        let mut console = Console::new(Cursor::new(answers.into_bytes()), Vec::new());
        run(&mut console, &service, set.id(), QuizSize::All)
            .await
            .unwrap();

        let stored = repo.get_set(set.id()).await.unwrap().unwrap();
        assert_eq!(stored.last_studied(), Some(fixed_now()));
    }

    #[tokio::test]
    async fn oversized_quiz_is_capped_with_a_note() {
        let repo = InMemoryRepository::new();
        let set = sample_sets(fixed_now()).unwrap().remove(0);
        repo.upsert_set(&set).await.unwrap();
        let service = QuizService::new(Clock::fixed(fixed_now()), Arc::new(repo)).with_seed(2);

        let mut console = Console::new(Cursor::new(b"q\n".to_vec()), Vec::new());
        run(&mut console, &service, set.id(), QuizSize::count(10).unwrap())
            .await
            .unwrap();

        let printed = String::from_utf8(console.out().clone()).unwrap();
        assert!(printed.contains("Quiz: Python Basics (5 questions)"));
        assert!(printed.contains("Asked for 10 questions; the set only has 5."));
    }
}

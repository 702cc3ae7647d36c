//! Demonstration sets for a fresh library.

use chrono::{DateTime, Duration, Utc};
use flashcards_core::model::{Card, CardId, FlashcardSet, SectionId, SetId};

struct SampleSet {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    section: &'static str,
    age_days: i64,
    /// Flags every card carries, whatever detection finds.
    code: bool,
    math: bool,
    cards: &'static [(&'static str, &'static str)],
}

const PYTHON_BASICS: SampleSet = SampleSet {
    id: "1",
    title: "Python Basics",
    description: "Core Python syntax and data structures",
    section: "cs",
    age_days: 1,
    code: true,
    math: false,
    cards: &[
        (
            "What is a list comprehension in Python?",
            "A concise way to create lists. Syntax: [expression for item in iterable if condition]\n\nExample:\n```python\nsquares = [x**2 for x in range(10)]\n```",
        ),
        (
            "Explain Python decorators",
            "Functions that modify the behavior of other functions, applied with the @decorator syntax.\n\n```python\n@my_decorator\ndef say_hello():\n    print(\"Hello!\")\n```",
        ),
        (
            "What is the difference between append() and extend()?",
            "append() adds a single element to the end of a list, while extend() adds every element of an iterable.",
        ),
        (
            "What does a dictionary's get() method return for a missing key?",
            "None, or the default passed as the second argument.",
        ),
        (
            "What is a generator?",
            "A function that yields values lazily, one at a time, keeping its state between calls.",
        ),
    ],
};

const DERIVATIVES: SampleSet = SampleSet {
    id: "2",
    title: "Calculus I - Derivatives",
    description: "Derivative rules and applications",
    section: "math",
    age_days: 2,
    code: false,
    math: true,
    cards: &[
        (
            "Power Rule",
            "If f(x) = x^n, then f'(x) = nx^(n-1)\n\nExample: If f(x) = x^3, then f'(x) = 3x^2",
        ),
        (
            "Chain Rule",
            "If y = f(g(x)), then dy/dx = f'(g(x)) · g'(x)",
        ),
        (
            "Product Rule",
            "If y = f(x) · g(x), then y' = f'(x) · g(x) + f(x) · g'(x)",
        ),
        (
            "Quotient Rule",
            "If y = f(x) / g(x), then y' = (f'(x) · g(x) - f(x) · g'(x)) / g(x)^2",
        ),
        ("Derivative of a constant", "0"),
    ],
};

/// Builds the sample sets, created relative to `now`.
///
/// # Errors
///
/// Returns `flashcards_core::Error` if any sample fails validation.
pub fn sample_sets(now: DateTime<Utc>) -> Result<Vec<FlashcardSet>, flashcards_core::Error> {
    [PYTHON_BASICS, DERIVATIVES]
        .iter()
        .map(|sample| build(sample, now))
        .collect()
}

fn build(sample: &SampleSet, now: DateTime<Utc>) -> Result<FlashcardSet, flashcards_core::Error> {
    let mut set = FlashcardSet::new(
        SetId::new(sample.id)?,
        sample.title,
        Some(sample.description.to_owned()),
        SectionId::new(sample.section)?,
        now - Duration::days(sample.age_days),
    )?;
    for (i, (term, definition)) in sample.cards.iter().enumerate() {
        let id = CardId::new(format!("{}-{}", sample.id, i + 1))?;
        let card = Card::new(id, *term, *definition)?
            .with_code(sample.code)
            .with_math(sample.math);
        set.push_card(card)?;
    }
    Ok(set)
}

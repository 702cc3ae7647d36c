mod card;
pub mod content;
mod ids;
mod section;
mod set;

pub use ids::{CardId, ParseIdError, SectionId, SetId};

pub use card::{Card, CardError};
pub use section::{Section, default_sections};
pub use set::{FlashcardSet, MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, SetError, percent};

use serde::{Deserialize, Serialize};

use crate::model::ids::SectionId;

/// A named, colored grouping of sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    /// CSS-style hex color, e.g. `#6B7280`.
    pub color: String,
}

impl Section {
    #[must_use]
    pub fn new(id: SectionId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Sections every new library starts with.
#[must_use]
pub fn default_sections() -> Vec<Section> {
    [
        ("default", "Uncategorized", "#6B7280"),
        ("math", "Mathematics", "#3B82F6"),
        ("cs", "Computer Science", "#8B5CF6"),
        ("science", "Science", "#10B981"),
    ]
    .into_iter()
    .filter_map(|(id, name, color)| {
        SectionId::new(id)
            .ok()
            .map(|id| Section::new(id, name, color))
    })
    .collect()
}

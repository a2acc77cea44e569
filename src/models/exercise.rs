use rusqlite::Row;
use serde::{Deserialize, Serialize, Serializer};

use super::{ExerciseId, FromSqliteRow};

/// Body-region label attached to an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Chest,
    Back,
    Legs,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Chest,
        Category::Back,
        Category::Legs,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chest => "chest",
            Category::Back => "back",
            Category::Legs => "legs",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Chest => "Chest",
            Category::Back => "Back",
            Category::Legs => "Legs",
            Category::Other => "Other",
        }
    }

    /// Label written by the first version of the app.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Category::Chest => "胸",
            Category::Back => "背中",
            Category::Legs => "脚",
            Category::Other => "その他",
        }
    }

    /// Parse a stored or submitted label. Legacy labels are accepted so old
    /// databases keep their categories.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s || c.legacy_label() == s)
    }
}

/// Category as seen by readers: rows without a usable label are `Uncategorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExerciseCategory {
    Tagged(Category),
    Uncategorized,
}

impl ExerciseCategory {
    pub const UNCATEGORIZED: &'static str = "uncategorized";

    /// Every category in display order, uncategorized last.
    pub const ORDER: [ExerciseCategory; 5] = [
        ExerciseCategory::Tagged(Category::Chest),
        ExerciseCategory::Tagged(Category::Back),
        ExerciseCategory::Tagged(Category::Legs),
        ExerciseCategory::Tagged(Category::Other),
        ExerciseCategory::Uncategorized,
    ];

    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(Category::parse).into()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Tagged(c) => c.as_str(),
            ExerciseCategory::Uncategorized => Self::UNCATEGORIZED,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseCategory::Tagged(c) => c.display_name(),
            ExerciseCategory::Uncategorized => "Uncategorized",
        }
    }
}

impl From<Option<Category>> for ExerciseCategory {
    fn from(category: Option<Category>) -> Self {
        match category {
            Some(c) => ExerciseCategory::Tagged(c),
            None => ExerciseCategory::Uncategorized,
        }
    }
}

impl Serialize for ExerciseCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub category: ExerciseCategory,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let category: Option<String> = row.get("category")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: ExerciseCategory::from_stored(category.as_deref()),
        })
    }
}

/// How `delete_exercise` picks its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseKey {
    Id(ExerciseId),
    /// Every exercise with exactly this name.
    Name(String),
}

#[derive(Debug, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl CreateExercise {
    /// Empty or unknown labels mean "no category".
    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.category)
    }
}

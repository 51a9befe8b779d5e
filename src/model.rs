use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Title used when a completion carries no usable title segment
pub const FALLBACK_TITLE: &str = "AI-Generated Recipe";

/// Identifier of a recipe, derived from the creation time in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecipeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(RecipeId)
    }
}

/// A generated or saved recipe.
///
/// Everything except `is_favorite` is fixed once the recipe is created.
/// The serialized field names match the layout stored under the
/// `savedRecipes` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Recipe {
    /// Render the recipe as plain text
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.title);

        if !self.ingredients.is_empty() {
            out.push_str("\nIngredients:\n");
            for ingredient in &self.ingredients {
                out.push_str(&format!("- {}\n", ingredient));
            }
        }

        if !self.instructions.is_empty() {
            out.push_str("\nInstructions:\n");
            for (i, step) in self.instructions.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, step));
            }
        }

        out
    }
}

/// Recipe listing returned by the catalog backend.
/// Only `title`, `image` and `link` are guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub time: Option<u32>,
    #[serde(default)]
    pub yields: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Hands out time-derived recipe ids that never repeat.
///
/// Ids are the current Unix time in milliseconds, bumped past the last id
/// handed out when two recipes are created within the same millisecond
/// (or the clock goes backwards).
#[derive(Debug, Default)]
pub struct RecipeIdGenerator {
    last: Mutex<u64>,
}

impl RecipeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the generator so it never hands out an id at or below `floor`
    pub fn starting_after(floor: RecipeId) -> Self {
        Self {
            last: Mutex::new(floor.0),
        }
    }

    pub fn next_id(&self) -> RecipeId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let id = now.max(last.saturating_add(1));
        *last = id;
        RecipeId(id)
    }
}

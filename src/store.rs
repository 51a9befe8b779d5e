use log::{debug, info, warn};

use crate::error::StoreError;
use crate::model::{Recipe, RecipeId};
use crate::storage::KeyValueStorage;

/// Storage key holding the serialized saved-recipe sequence
pub const SAVED_RECIPES_KEY: &str = "savedRecipes";

/// Locally persisted, insertion-ordered collection of saved recipes.
///
/// Every mutation rewrites the whole sequence to storage. When a write
/// fails the mutation is kept in memory and the error is returned, so a
/// later successful write persists it.
#[derive(Debug)]
pub struct SavedRecipeStore<S: KeyValueStorage> {
    storage: S,
    recipes: Vec<Recipe>,
}

impl<S: KeyValueStorage> SavedRecipeStore<S> {
    /// Open the store, rehydrating whatever `storage` holds
    pub fn load(storage: S) -> Self {
        let mut store = Self {
            storage,
            recipes: Vec::new(),
        };
        store.reload();
        store
    }

    /// Replace the in-memory sequence with the persisted one.
    ///
    /// A missing key, unreadable storage or malformed content all yield an
    /// empty store.
    pub fn reload(&mut self) -> &[Recipe] {
        self.recipes = match self.storage.get(SAVED_RECIPES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Recipe>>(&raw) {
                Ok(recipes) => dedup_by_id(recipes),
                Err(e) => {
                    warn!("Discarding unreadable saved recipes: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read saved recipes, starting empty: {}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} saved recipes", self.recipes.len());
        &self.recipes
    }

    /// Append `recipe` and persist the full sequence
    pub fn save(&mut self, recipe: Recipe) -> Result<(), StoreError> {
        if self.get(recipe.id).is_some() {
            return Err(StoreError::DuplicateId(recipe.id));
        }
        info!("Saving recipe {} '{}'", recipe.id, recipe.title);
        self.recipes.push(recipe);
        self.persist()
    }

    /// Flip the favorite flag of the recipe with `id`.
    ///
    /// Returns `Ok(false)` without touching storage when no recipe matches.
    pub fn toggle_favorite(&mut self, id: RecipeId) -> Result<bool, StoreError> {
        let Some(recipe) = self.recipes.iter_mut().find(|r| r.id == id) else {
            debug!("No saved recipe with id {}", id);
            return Ok(false);
        };
        recipe.is_favorite = !recipe.is_favorite;
        debug!("Recipe {} favorite = {}", id, recipe.is_favorite);
        self.persist()?;
        Ok(true)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(|r| r.is_favorite)
    }

    /// Highest id in the store, used to seed id generation
    pub fn max_id(&self) -> Option<RecipeId> {
        self.recipes.iter().map(|r| r.id).max()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write the full in-memory sequence, overwriting what was stored
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&self.recipes)?;
        if let Err(e) = self.storage.set(SAVED_RECIPES_KEY, &serialized) {
            warn!(
                "Could not persist {} saved recipes: {}",
                self.recipes.len(),
                e
            );
            return Err(e.into());
        }
        Ok(())
    }
}

/// Keep the first recipe for each id so loaded data honours id uniqueness
fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let total = recipes.len();
    let mut seen = std::collections::HashSet::new();
    let unique: Vec<Recipe> = recipes.into_iter().filter(|r| seen.insert(r.id)).collect();
    if unique.len() != total {
        warn!(
            "Dropped {} saved recipes with duplicate ids",
            total - unique.len()
        );
    }
    unique
}

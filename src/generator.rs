use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{GenerationError, StoreError};
use crate::model::{Recipe, RecipeId, RecipeIdGenerator};
use crate::parser::parse_completion;
use crate::providers::{
    build_user_prompt, CompletionRequest, LlmProvider, RECIPE_GENERATOR_PROMPT,
};
use crate::storage::KeyValueStorage;
use crate::store::SavedRecipeStore;

/// What the user asked the generator for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Free-text ingredient list
    pub ingredients: String,
    /// Optional cuisine preference, e.g. "Italian"
    pub cuisine: Option<String>,
    /// Optional dietary restriction, e.g. "Vegan"
    pub diet: Option<String>,
}

impl GenerationRequest {
    pub fn new(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            ..Default::default()
        }
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    /// Prompt pair sent to the completion provider
    pub fn to_completion_request(&self) -> CompletionRequest {
        CompletionRequest {
            system: RECIPE_GENERATOR_PROMPT.trim().to_string(),
            user: build_user_prompt(
                &self.ingredients,
                self.cuisine.as_deref(),
                self.diet.as_deref(),
            ),
        }
    }
}

/// Generates recipes through a completion provider, one request at a time.
///
/// The most recent successful result is kept as the current generated recipe
/// until it is replaced by the next one.
pub struct RecipeGenerator {
    provider: Box<dyn LlmProvider>,
    ids: RecipeIdGenerator,
    in_flight: AtomicBool,
    generated: Mutex<Option<Recipe>>,
}

/// Clears the in-flight flag when the request finishes, however it finishes
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RecipeGenerator {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self::with_ids(provider, RecipeIdGenerator::new())
    }

    /// Use a custom id source, e.g. one seeded past the ids already saved
    pub fn with_ids(provider: Box<dyn LlmProvider>, ids: RecipeIdGenerator) -> Self {
        Self {
            provider,
            ids,
            in_flight: AtomicBool::new(false),
            generated: Mutex::new(None),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Whether a request is currently pending
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Request a completion for `request` and parse it into a recipe.
    ///
    /// Fails fast with [`GenerationError::AlreadyInFlight`] while another
    /// request is pending. Failed requests are not retried.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Recipe, GenerationError> {
        if request.ingredients.trim().is_empty() {
            return Err(GenerationError::MissingIngredients);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GenerationError::AlreadyInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        info!(
            "Generating recipe with {} from: {}",
            self.provider.provider_name(),
            request.ingredients.trim()
        );

        let completion = self
            .provider
            .complete(&request.to_completion_request())
            .await
            .map_err(|e| {
                error!("Recipe generation failed: {}", e);
                GenerationError::Completion(e.to_string())
            })?;

        let recipe = parse_completion(&completion).into_recipe(self.ids.next_id());
        info!("Generated recipe {} '{}'", recipe.id, recipe.title);

        *self.generated.lock().unwrap_or_else(|e| e.into_inner()) = Some(recipe.clone());
        Ok(recipe)
    }

    /// The most recently generated recipe, if any
    pub fn generated(&self) -> Option<Recipe> {
        self.generated
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Copy the current generated recipe into `store`.
    ///
    /// Returns `Ok(None)` and leaves the store untouched when nothing has
    /// been generated yet.
    pub fn save_generated<S: KeyValueStorage>(
        &self,
        store: &mut SavedRecipeStore<S>,
    ) -> Result<Option<RecipeId>, StoreError> {
        let Some(recipe) = self.generated() else {
            return Ok(None);
        };
        let id = recipe.id;
        store.save(recipe)?;
        Ok(Some(id))
    }
}

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod providers;
pub mod storage;
pub mod store;

use log::debug;
use std::time::Duration;

pub use catalog::CatalogClient;
pub use config::AppConfig;
pub use error::{CatalogError, GenerationError, SimpliCookError, StorageError, StoreError};
pub use generator::{GenerationRequest, RecipeGenerator};
pub use model::{Recipe, RecipeId, RecipeIdGenerator, RecipeSummary, FALLBACK_TITLE};
pub use parser::{parse_completion, ParsedRecipe};
pub use providers::{LlmProvider, ProviderKind};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{SavedRecipeStore, SAVED_RECIPES_KEY};

/// Open the saved-recipe store in the configured storage directory
pub fn open_store(config: &AppConfig) -> SavedRecipeStore<FileStorage> {
    debug!("Opening saved recipes in {:?}", config.storage.dir);
    SavedRecipeStore::load(FileStorage::new(&config.storage.dir))
}

/// Build a generator for the configured default provider.
///
/// Ids continue after `floor` when given, so new recipes never clash with
/// ones already saved.
pub fn generator_from_config(
    config: &AppConfig,
    floor: Option<RecipeId>,
) -> Result<RecipeGenerator, SimpliCookError> {
    providers::build_generator(config, floor)
}

/// Catalog client for the configured backend
pub fn catalog_from_config(config: &AppConfig) -> CatalogClient {
    CatalogClient::with_timeout(
        config.catalog.base_url.clone(),
        Duration::from_secs(config.timeout),
    )
}

/// Generate a recipe with the configured default provider
pub async fn generate_recipe(request: &GenerationRequest) -> Result<Recipe, SimpliCookError> {
    let config = AppConfig::load()?;
    let generator = generator_from_config(&config, None)?;
    Ok(generator.generate(request).await?)
}

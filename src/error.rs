use thiserror::Error;

use crate::model::RecipeId;

/// Errors raised by a durable key/value storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// The value would not fit in the storage quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Storage is disabled or otherwise unreachable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the saved-recipe store.
///
/// All of these are recoverable: the in-memory sequence is kept intact and
/// only the durable write is dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to serialize the recipe sequence
    #[error("Failed to serialize saved recipes: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The storage backend rejected the write
    #[error("Failed to persist saved recipes: {0}")]
    Write(#[from] StorageError),

    /// A recipe with this id is already saved
    #[error("Recipe {0} is already saved")]
    DuplicateId(RecipeId),
}

/// Errors that can occur while generating a recipe
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The request carried no usable ingredients
    #[error("Please enter at least one ingredient.")]
    MissingIngredients,

    /// Another generation request is still pending
    #[error("A recipe is already being generated")]
    AlreadyInFlight,

    /// The completion collaborator failed (network, status or payload)
    #[error("Failed to generate a recipe. Please try again. ({0})")]
    Completion(String),
}

/// Errors returned by the recipe catalog client
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Request could not be sent or the body could not be decoded
    #[error("Failed to fetch catalog: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Catalog request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Search query was blank
    #[error("Search query is required")]
    EmptyQuery,

    /// Category is not one the backend knows about
    #[error("Invalid or missing category: {0}")]
    UnknownCategory(String),
}

/// Top-level error for the SimpliCook library
#[derive(Error, Debug)]
pub enum SimpliCookError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Provider could not be created from configuration
    #[error("Provider error: {0}")]
    Provider(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Pull a readable message out of an error response body.
///
/// Understands `{"error": "..."}` and `{"error": {"message": "..."}}`
/// and falls back to the raw text for anything else (HTML pages from
/// proxies, plain text).
pub(crate) fn error_body_message(body: &str) -> String {
    let body = body.trim();
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &json["error"];
        if let Some(message) = error["message"].as_str().or_else(|| error.as_str()) {
            return message.to_string();
        }
    }
    if body.is_empty() {
        "empty response body".to_string()
    } else {
        body.to_string()
    }
}

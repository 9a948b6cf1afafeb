//! Unified error types and result handling.
//!
//! The calculation engine itself never fails; every variant here belongs to the
//! surrounding layers (configuration, persistence, validation, session).

use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Any failure reported by `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation that needs a signed-in user was called without one
    #[error("No user is signed in")]
    Unauthenticated,

    /// A required input was not supplied
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// The referenced client does not exist
    #[error("Client not found: {id}")]
    ClientNotFound {
        /// Requested client ID
        id: i64,
    },

    /// The referenced recipe does not exist
    #[error("Recipe not found: {id}")]
    RecipeNotFound {
        /// Requested recipe ID
        id: i64,
    },

    /// An ingredient edit addressed a row that is not in the list
    #[error("Ingredient index {index} out of range for {len} ingredients")]
    IngredientIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current number of ingredients
        len: usize,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

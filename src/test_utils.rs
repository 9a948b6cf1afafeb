//! Shared test utilities for the recipe BOM crate.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test clients and recipes with sensible defaults.

use crate::{
    core::{
        calculations::{Ingredient, MasterInputs},
        client,
        draft::RecipeDraft,
        recipe::{self, NewRecipe},
        session::UserIdentity,
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The signed-in user every test operates as.
#[must_use]
pub fn test_user() -> UserIdentity {
    UserIdentity::new("test_user", Some("test@example.com".to_string()))
}

/// Asserts two floats agree to within a relative tolerance of `1e-9`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// The inputs used by most recipe tests.
///
/// # Defaults
/// * `moisture_in_product`: 20.0
/// * `allowance_percentage`: 10.0
/// * `production_quantity`: 90.0
#[must_use]
pub const fn test_inputs() -> MasterInputs {
    MasterInputs {
        moisture_in_product: 20.0,
        allowance_percentage: 10.0,
        production_quantity: 90.0,
    }
}

/// A draft holding a single 100 kg, 10% moisture ingredient at rate 5.
#[must_use]
pub fn test_draft() -> RecipeDraft {
    let mut draft = RecipeDraft::new(test_inputs());
    draft.add_ingredient(Ingredient::new("Flour", 100.0, 10.0, 5.0).with_amount("100", "kg"));
    draft
}

/// Creates a test client owned by [`test_user`].
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(db, Some(&test_user()), name.to_string()).await
}

/// Creates a test recipe for the given client from [`test_draft`].
pub async fn create_test_recipe(
    db: &DatabaseConnection,
    name: &str,
    client_id: i64,
) -> Result<entities::recipe::Model> {
    recipe::create_recipe(
        db,
        Some(&test_user()),
        NewRecipe {
            client_id: Some(client_id),
            name: name.to_string(),
            description: Some("Test description".to_string()),
            instructions: None,
            draft: test_draft(),
        },
    )
    .await
}

/// Sets up a complete test environment with a client.
/// Returns (db, client) for common test scenarios.
pub async fn setup_with_client() -> Result<(DatabaseConnection, entities::client::Model)> {
    let db = setup_test_db().await?;
    let client = create_test_client(&db, "Test Client").await?;
    Ok((db, client))
}

/// Sets up a complete test environment with client and recipe.
/// Returns (db, client, recipe) for recipe-related tests.
pub async fn setup_with_recipe() -> Result<(
    DatabaseConnection,
    entities::client::Model,
    entities::recipe::Model,
)> {
    let (db, client) = setup_with_client().await?;
    let recipe = create_test_recipe(&db, "Test Recipe", client.id).await?;
    Ok((db, client, recipe))
}

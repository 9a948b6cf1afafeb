//! Recipe business logic - Handles all recipe-related operations.
//!
//! Recipes are always written together with a fresh BOM snapshot: the ingredient
//! rows, the raw master inputs and the derived master quantities are taken from
//! a [`RecipeDraft`] and replaced as a whole. Nothing here recomputes values on
//! read; what was saved is what is returned.

use crate::{
    core::{
        client,
        draft::RecipeDraft,
        session::{UserIdentity, require_user},
    },
    entities::{Recipe, recipe},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument, warn};

/// Input for [`create_recipe`]: everything except `id`, `created_at` and `created_by`.
#[derive(Clone, Debug)]
pub struct NewRecipe {
    /// Owning client; required
    pub client_id: Option<i64>,
    /// Recipe name; required
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional instructions
    pub instructions: Option<String>,
    /// Ingredients and master inputs
    pub draft: RecipeDraft,
}

/// Partial update for [`update_recipe`]. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct RecipeUpdate {
    /// New name
    pub name: Option<String>,
    /// New description; `Some(None)` clears it
    pub description: Option<Option<String>>,
    /// New instructions; `Some(None)` clears it
    pub instructions: Option<Option<String>>,
    /// Replacement ingredient list and master inputs
    pub draft: Option<RecipeDraft>,
}

/// Retrieves a recipe by ID.
///
/// # Errors
/// Returns [`Error::RecipeNotFound`] if no recipe has this ID.
pub async fn get_recipe(db: &DatabaseConnection, recipe_id: i64) -> Result<recipe::Model> {
    Recipe::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or(Error::RecipeNotFound { id: recipe_id })
}

/// Retrieves all recipes of one client, newest first.
#[instrument(skip(db))]
pub async fn list_recipes_by_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<recipe::Model>> {
    Recipe::find()
        .filter(recipe::Column::ClientId.eq(client_id))
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a recipe owned by the signed-in user.
///
/// The draft is recalculated once more before saving so the stored snapshot is
/// consistent with its raw inputs.
///
/// # Errors
/// Returns an error if:
/// - Nobody is signed in
/// - No client was selected or the recipe name is empty
/// - The client does not exist
/// - The database insert operation fails
#[instrument(skip(db, user, new_recipe), fields(name = %new_recipe.name))]
pub async fn create_recipe(
    db: &DatabaseConnection,
    user: Option<&UserIdentity>,
    new_recipe: NewRecipe,
) -> Result<recipe::Model> {
    let user = require_user(user)?;
    let client_id = new_recipe
        .client_id
        .ok_or(Error::MissingField { field: "client" })?;
    let name = validated_name(&new_recipe.name)?;

    if client::get_client_by_id(db, client_id).await?.is_none() {
        warn!(client_id, "Recipe references unknown client");
        return Err(Error::ClientNotFound { id: client_id });
    }

    let mut recipe = recipe::ActiveModel {
        name: Set(name),
        description: Set(new_recipe.description),
        instructions: Set(new_recipe.instructions),
        client_id: Set(client_id),
        created_by: Set(user.id.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    set_snapshot(&mut recipe, new_recipe.draft);

    let created = recipe.insert(db).await?;
    debug!(recipe_id = created.id, "Created recipe");
    Ok(created)
}

/// Applies a partial update to a recipe.
///
/// When the update carries a draft, the ingredient list, master inputs and
/// derived master quantities are all replaced together.
///
/// # Errors
/// Returns an error if:
/// - The recipe does not exist
/// - A new name is supplied but empty
/// - The database update operation fails
#[instrument(skip(db, update))]
pub async fn update_recipe(
    db: &DatabaseConnection,
    recipe_id: i64,
    update: RecipeUpdate,
) -> Result<recipe::Model> {
    let mut recipe: recipe::ActiveModel = get_recipe(db, recipe_id).await?.into();

    if let Some(name) = update.name {
        recipe.name = Set(validated_name(&name)?);
    }
    if let Some(description) = update.description {
        recipe.description = Set(description);
    }
    if let Some(instructions) = update.instructions {
        recipe.instructions = Set(instructions);
    }
    if let Some(draft) = update.draft {
        set_snapshot(&mut recipe, draft);
    }

    recipe.update(db).await.map_err(Into::into)
}

/// Rebuilds an editing session from a stored recipe.
#[must_use]
pub fn load_draft(recipe: &recipe::Model) -> RecipeDraft {
    RecipeDraft::from_parts(recipe.ingredients.0.clone(), recipe.master_inputs())
}

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::MissingField { field: "name" });
    }
    Ok(name.to_string())
}

fn set_snapshot(recipe: &mut recipe::ActiveModel, draft: RecipeDraft) {
    let draft = RecipeDraft::from_parts(draft.ingredients().to_vec(), *draft.inputs());
    let (ingredients, inputs, master) = draft.into_parts();

    recipe.ingredients = Set(recipe::IngredientList(ingredients));
    recipe.moisture_in_product = Set(inputs.moisture_in_product);
    recipe.allowance_percentage = Set(inputs.allowance_percentage);
    recipe.production_quantity = Set(inputs.production_quantity);
    recipe.final_dry_wt = Set(master.final_dry_wt);
    recipe.moisture = Set(master.moisture);
    recipe.final_output = Set(master.final_output);
    recipe.final_quantity = Set(master.final_quantity);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::calculations::{Ingredient, MasterInputs};
    use crate::core::draft::IngredientEdit;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn new_recipe(client_id: Option<i64>, name: &str) -> NewRecipe {
        NewRecipe {
            client_id,
            name: name.to_string(),
            description: None,
            instructions: None,
            draft: test_draft(),
        }
    }

    #[tokio::test]
    async fn test_create_recipe_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_recipe(&db, None, new_recipe(Some(1), "Bread")).await;
        assert!(matches!(result.unwrap_err(), Error::Unauthenticated));

        let result = create_recipe(&db, Some(&test_user()), new_recipe(None, "Bread")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MissingField { field: "client" }
        ));

        let result = create_recipe(&db, Some(&test_user()), new_recipe(Some(1), "  ")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MissingField { field: "name" }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_recipe_unknown_client() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_recipe(&db, Some(&test_user()), new_recipe(Some(42), "Bread")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ClientNotFound { id: 42 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_recipe_persists_snapshot() -> Result<()> {
        let (db, client, created) = setup_with_recipe().await?;

        assert_eq!(created.client_id, client.id);
        assert_eq!(created.created_by, "test_user");
        assert_eq!(created.moisture_in_product, 20.0);
        assert_close(created.final_dry_wt, 90.0);
        assert_close(created.moisture, 18.0);
        assert_close(created.final_output, 108.0);
        assert_close(created.final_quantity, 97.2);

        let stored = get_recipe(&db, created.id).await?;
        assert_eq!(stored, created);

        let flour = &stored.ingredients.0[0];
        assert_eq!(flour.name, "Flour");
        assert_eq!(flour.amount, "100");
        assert_close(flour.water_in_kg, 10.0);
        assert_close(flour.bom_qty_theoretical, 100.0 / 108.0 * 90.0);

        let master = stored.master_configuration();
        assert_close(master.total_weight, 100.0);
        assert_close(master.total_water_in_kg, 10.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_recipe_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_recipe(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::RecipeNotFound { id: 999 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_descriptive_fields_only() -> Result<()> {
        let (db, _client, created) = setup_with_recipe().await?;

        let updated = update_recipe(
            &db,
            created.id,
            RecipeUpdate {
                name: Some("Sourdough".to_string()),
                description: Some(None),
                instructions: Some(Some("Bake at 230C".to_string())),
                draft: None,
            },
        )
        .await?;

        assert_eq!(updated.name, "Sourdough");
        assert_eq!(updated.description, None);
        assert_eq!(updated.instructions.as_deref(), Some("Bake at 230C"));
        assert_eq!(updated.ingredients, created.ingredients);
        assert_eq!(updated.final_output, created.final_output);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_whole_snapshot() -> Result<()> {
        let (db, _client, created) = setup_with_recipe().await?;

        let mut draft = load_draft(&created);
        draft.add_ingredient(Ingredient::new("Water", 60.0, 100.0, 0.0));
        draft.edit_ingredient(0, IngredientEdit::Rate(6.0))?;
        draft.set_allowance_percentage(0.0);

        let updated = update_recipe(
            &db,
            created.id,
            RecipeUpdate {
                draft: Some(draft.clone()),
                ..RecipeUpdate::default()
            },
        )
        .await?;

        assert_eq!(updated.ingredients.0, draft.ingredients());
        assert_eq!(updated.allowance_percentage, 0.0);
        assert_eq!(updated.final_output, draft.master().final_output);
        assert_eq!(updated.final_quantity, draft.master().final_output);
        assert_eq!(updated.name, created.name);

        let stored = get_recipe(&db, created.id).await?;
        assert_eq!(stored, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_empty_name() -> Result<()> {
        let (db, _client, created) = setup_with_recipe().await?;
        let result = update_recipe(
            &db,
            created.id,
            RecipeUpdate {
                name: Some(String::new()),
                ..RecipeUpdate::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MissingField { field: "name" }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_recipe() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_recipe(&db, 7, RecipeUpdate::default()).await;
        assert!(matches!(result.unwrap_err(), Error::RecipeNotFound { id: 7 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_recipes_by_client() -> Result<()> {
        let (db, client, first) = setup_with_recipe().await?;
        let other_client = create_test_client(&db, "Other Client").await?;

        let second = create_test_recipe(&db, "Second Recipe", client.id).await?;
        create_test_recipe(&db, "Elsewhere", other_client.id).await?;

        let recipes = list_recipes_by_client(&db, client.id).await?;
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, second.id);
        assert_eq!(recipes[1].id, first.id);

        assert!(list_recipes_by_client(&db, 999).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_recipe_is_all_zero() -> Result<()> {
        let (db, client) = setup_with_client().await?;
        let created = create_recipe(
            &db,
            Some(&test_user()),
            NewRecipe {
                client_id: Some(client.id),
                name: "Blank".to_string(),
                description: None,
                instructions: None,
                draft: RecipeDraft::new(MasterInputs::default()),
            },
        )
        .await?;

        assert!(created.ingredients.0.is_empty());
        assert_eq!(created.final_dry_wt, 0.0);
        assert_eq!(created.final_output, 0.0);
        assert_eq!(created.final_quantity, 0.0);
        Ok(())
    }

    #[test]
    fn test_load_draft_matches_stored_values() {
        let draft = test_draft();
        let (ingredients, inputs, master) = draft.clone().into_parts();
        let model = recipe::Model {
            id: 1,
            name: "Bread".to_string(),
            description: None,
            instructions: None,
            client_id: 1,
            created_by: "test_user".to_string(),
            created_at: chrono::Utc::now(),
            ingredients: recipe::IngredientList(ingredients),
            moisture_in_product: inputs.moisture_in_product,
            allowance_percentage: inputs.allowance_percentage,
            production_quantity: inputs.production_quantity,
            final_dry_wt: master.final_dry_wt,
            moisture: master.moisture,
            final_output: master.final_output,
            final_quantity: master.final_quantity,
        };

        assert_eq!(load_draft(&model), draft);
        assert_eq!(model.master_configuration(), master);
    }
}

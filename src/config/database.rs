//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches the
//! Rust structs without hand-written SQL.

use crate::entities::{Client, Recipe};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Database used when `DATABASE_URL` is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/recipe_bom.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, or the
/// default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the given database URL.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the `clients` and `recipes` tables if they do not exist yet.
///
/// Clients are created first because `recipes.client_id` references them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut client_table = schema.create_table_from_entity(Client);
    let mut recipe_table = schema.create_table_from_entity(Recipe);

    client_table.if_not_exists();
    recipe_table.if_not_exists();

    db.execute(builder.build(&client_table)).await?;
    db.execute(builder.build(&recipe_table)).await?;

    info!("Database tables are ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{client::Model as ClientModel, recipe::Model as RecipeModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection() -> Result<()> {
        // In-memory database keeps tests isolated from any local file
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        let _: Vec<RecipeModel> = Recipe::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}

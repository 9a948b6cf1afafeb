//! Client business logic - Handles all client-related operations.
//!
//! Provides functions for listing, looking up, creating and seeding clients.
//! All functions are async and return Result types for error handling.

use crate::{
    config::settings::ClientSeed,
    core::session::{UserIdentity, require_user},
    entities::{Client, client},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Retrieves all clients, newest first.
#[instrument(skip(db))]
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_desc(client::Column::CreatedAt)
        .order_by_desc(client::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a client by its unique ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a client by its exact name.
pub async fn get_client_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<client::Model>> {
    Client::find()
        .filter(client::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new client owned by the signed-in user.
///
/// # Errors
/// Returns an error if:
/// - Nobody is signed in
/// - The name is empty or whitespace-only
/// - The database insert operation fails
#[instrument(skip(db, user))]
pub async fn create_client(
    db: &DatabaseConnection,
    user: Option<&UserIdentity>,
    name: String,
) -> Result<client::Model> {
    let user = require_user(user)?;

    if name.trim().is_empty() {
        return Err(Error::MissingField { field: "name" });
    }

    let client = client::ActiveModel {
        name: Set(name.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        created_by: Set(user.id.clone()),
        ..Default::default()
    };

    let created = client.insert(db).await?;
    debug!(client_id = created.id, "Created client");
    Ok(created)
}

/// Creates every seeded client that does not exist yet, returning the new ones.
#[instrument(skip_all, fields(seeds = seeds.len()))]
pub async fn seed_clients(
    db: &DatabaseConnection,
    user: Option<&UserIdentity>,
    seeds: &[ClientSeed],
) -> Result<Vec<client::Model>> {
    let mut created = Vec::new();
    for seed in seeds {
        if get_client_by_name(db, seed.name.trim()).await?.is_some() {
            debug!("Client '{}' already exists. Skipping.", seed.name);
            continue;
        }
        created.push(create_client(db, user, seed.name.clone()).await?);
    }
    info!("Seeded {} new clients", created.len());
    Ok(created)
}

//! Client entity - A customer that recipes are developed for.
//!
//! Each client has a name and ownership metadata, and owns zero or more recipes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the client (e.g., "Acme Bakery")
    pub name: String,
    /// When the client was created
    pub created_at: DateTimeUtc,
    /// ID of the user who created the client
    pub created_by: String,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many recipes
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipes,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

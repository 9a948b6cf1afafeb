//! Recipe entity - A client's recipe with its full BOM snapshot.
//!
//! The ingredient list (raw and derived columns) is stored as one JSON document,
//! alongside the raw master inputs and the derived master quantities. The stored
//! values are whatever the calculation engine produced when the recipe was last
//! saved; they are not recomputed on read.

use crate::core::calculations::{Ingredient, MasterConfiguration, MasterInputs, finite_or_zero};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ordered ingredient rows, persisted as a JSON array
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct IngredientList(pub Vec<Ingredient>);

/// Recipe database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    /// Unique identifier for the recipe
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional preparation instructions
    pub instructions: Option<String>,
    /// ID of the client this recipe belongs to
    pub client_id: i64,
    /// ID of the user who created the recipe
    pub created_by: String,
    /// When the recipe was created
    pub created_at: DateTimeUtc,
    /// Ingredient rows with their derived BOM columns
    #[sea_orm(column_type = "Json")]
    pub ingredients: IngredientList,
    /// Target product moisture, percent
    pub moisture_in_product: f64,
    /// Production loss allowance, percent
    pub allowance_percentage: f64,
    /// Target batch mass in kilograms
    pub production_quantity: f64,
    /// Derived: dry weight of all ingredients
    pub final_dry_wt: f64,
    /// Derived: water added back to reach target moisture
    pub moisture: f64,
    /// Derived: dry weight plus moisture
    pub final_output: f64,
    /// Derived: final output after allowance
    pub final_quantity: f64,
}

impl Model {
    /// Raw master inputs as stored
    #[must_use]
    pub const fn master_inputs(&self) -> MasterInputs {
        MasterInputs {
            moisture_in_product: self.moisture_in_product,
            allowance_percentage: self.allowance_percentage,
            production_quantity: self.production_quantity,
        }
    }

    /// Master configuration as stored.
    ///
    /// Weight and water totals are summed from the stored ingredient rows; the
    /// remaining fields come straight from the snapshot columns.
    #[must_use]
    pub fn master_configuration(&self) -> MasterConfiguration {
        let rows = &self.ingredients.0;
        MasterConfiguration {
            total_weight: finite_or_zero(rows.iter().map(|i| i.weight).sum()),
            total_water_in_kg: finite_or_zero(rows.iter().map(|i| i.water_in_kg).sum()),
            final_dry_wt: self.final_dry_wt,
            moisture: self.moisture,
            final_output: self.final_output,
            final_quantity: self.final_quantity,
        }
    }
}

/// Defines relationships between Recipe and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each recipe belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

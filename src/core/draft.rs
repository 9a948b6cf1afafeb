//! In-memory recipe editing session.
//!
//! A [`RecipeDraft`] owns one recipe's ingredient list and master inputs while it
//! is being edited. Every mutation goes through a method that finishes with a
//! full [`recalculate`] pass, so the stored derived fields are never stale.

use crate::{
    core::calculations::{Ingredient, MasterConfiguration, MasterInputs, recalculate},
    errors::{Error, Result},
};
use tracing::trace;

/// A change to one raw field of one ingredient.
#[derive(Clone, Debug, PartialEq)]
pub enum IngredientEdit {
    /// Replace the display name
    Name(String),
    /// Replace the free-form amount
    Amount(String),
    /// Replace the free-form unit
    Unit(String),
    /// Replace the weight in kilograms
    Weight(f64),
    /// Replace the moisture percentage
    MoisturePercentage(f64),
    /// Replace the rate per kilogram
    Rate(f64),
}

impl IngredientEdit {
    fn apply_to(self, ingredient: &mut Ingredient) {
        match self {
            Self::Name(name) => ingredient.name = name,
            Self::Amount(amount) => ingredient.amount = amount,
            Self::Unit(unit) => ingredient.unit = unit,
            Self::Weight(weight) => ingredient.weight = weight,
            Self::MoisturePercentage(moisture) => ingredient.moisture_percentage = moisture,
            Self::Rate(rate) => ingredient.rate = rate,
        }
    }
}

/// Returns a copy of `ingredients` with one raw field of the row at `index` replaced.
///
/// Derived fields are left as they were; callers must recalculate afterwards.
pub fn apply_edit(
    ingredients: &[Ingredient],
    index: usize,
    edit: IngredientEdit,
) -> Result<Vec<Ingredient>> {
    let mut edited = ingredients.to_vec();
    let target = edited
        .get_mut(index)
        .ok_or(Error::IngredientIndexOutOfRange {
            index,
            len: ingredients.len(),
        })?;
    edit.apply_to(target);
    Ok(edited)
}

/// Editing state for a single recipe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeDraft {
    ingredients: Vec<Ingredient>,
    inputs: MasterInputs,
    master: MasterConfiguration,
}

impl RecipeDraft {
    /// Starts an empty draft; the master configuration is all zeros.
    #[must_use]
    pub fn new(inputs: MasterInputs) -> Self {
        Self::from_parts(Vec::new(), inputs)
    }

    /// Rebuilds a draft from stored raw data and recalculates it.
    #[must_use]
    pub fn from_parts(ingredients: Vec<Ingredient>, inputs: MasterInputs) -> Self {
        let mut draft = Self {
            ingredients,
            inputs,
            master: MasterConfiguration::default(),
        };
        draft.recompute();
        draft
    }

    /// Current ingredient rows with up-to-date derived fields
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Current raw master inputs
    #[must_use]
    pub const fn inputs(&self) -> &MasterInputs {
        &self.inputs
    }

    /// Master configuration from the last recalculation
    #[must_use]
    pub const fn master(&self) -> &MasterConfiguration {
        &self.master
    }

    /// Consumes the draft, returning its ingredients, inputs and master configuration.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Ingredient>, MasterInputs, MasterConfiguration) {
        (self.ingredients, self.inputs, self.master)
    }

    /// Appends an ingredient row.
    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.push(ingredient);
        self.recompute();
    }

    /// Removes and returns the ingredient row at `index`.
    pub fn remove_ingredient(&mut self, index: usize) -> Result<Ingredient> {
        if index >= self.ingredients.len() {
            return Err(Error::IngredientIndexOutOfRange {
                index,
                len: self.ingredients.len(),
            });
        }
        let removed = self.ingredients.remove(index);
        self.recompute();
        Ok(removed)
    }

    /// Replaces one raw field of the row at `index`.
    pub fn edit_ingredient(&mut self, index: usize, edit: IngredientEdit) -> Result<()> {
        self.ingredients = apply_edit(&self.ingredients, index, edit)?;
        self.recompute();
        Ok(())
    }

    /// Sets the target moisture of the finished product.
    pub fn set_moisture_in_product(&mut self, value: f64) {
        self.inputs.moisture_in_product = value;
        self.recompute();
    }

    /// Sets the allowance percentage.
    pub fn set_allowance_percentage(&mut self, value: f64) {
        self.inputs.allowance_percentage = value;
        self.recompute();
    }

    /// Sets the production quantity.
    pub fn set_production_quantity(&mut self, value: f64) {
        self.inputs.production_quantity = value;
        self.recompute();
    }

    fn recompute(&mut self) {
        let (master, ingredients) = recalculate(&self.ingredients, &self.inputs);
        trace!(
            ingredients = ingredients.len(),
            final_output = master.final_output,
            final_quantity = master.final_quantity,
            "Recalculated recipe draft"
        );
        self.master = master;
        self.ingredients = ingredients;
    }
}

//! Bill-of-materials recalculation engine.
//!
//! Two pure passes turn raw ingredient inputs (weight, moisture, rate) into the
//! derived BOM columns. [`compute_master_configuration`] reduces the list to the
//! recipe-level quantities, then [`compute_ingredient_totals`] derives every
//! ingredient's percentages, quantities and cost from them. [`recalculate`] runs
//! both in that order and is what editing code should call after any change.
//!
//! Every division is guarded: a zero (or negative) denominator yields `0.0`, and
//! any non-finite intermediate collapses to `0.0`, so no output field is ever
//! `NaN` or infinite.

use serde::{Deserialize, Deserializer, Serialize};

/// A single row of a recipe's ingredient list.
///
/// Field names serialize in camelCase so stored ingredient lists keep the same
/// JSON shape as records written by earlier clients.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Display name (e.g. "Wheat flour")
    #[serde(default)]
    pub name: String,
    /// Free-form amount as typed by the user
    #[serde(default)]
    pub amount: String,
    /// Free-form unit as typed by the user
    #[serde(default)]
    pub unit: String,
    /// Raw weight in kilograms
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: f64,
    /// Raw moisture content, percent of weight
    #[serde(default, deserialize_with = "lenient_f64")]
    pub moisture_percentage: f64,
    /// Cost per kilogram
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,

    /// Share of the recipe's total weight, percent
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ingredient_percentage: f64,
    /// Share of the final output, percent
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bom_percentage: f64,
    /// Water carried by this ingredient, kilograms
    #[serde(default, deserialize_with = "lenient_f64")]
    pub water_in_kg: f64,
    /// Share of the allowance-adjusted final quantity, percent
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bom_with_allowance: f64,
    /// Quantity needed for the production run, kilograms
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bom_qty_theoretical: f64,
    /// Theoretical quantity plus the allowance buffer, kilograms
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bom_qty_with_allowance: f64,
    /// `rate * bom_qty_with_allowance`
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_cost: f64,
}

impl Ingredient {
    /// Creates an ingredient from its numeric raw inputs; derived fields start at zero.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64, moisture_percentage: f64, rate: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            moisture_percentage,
            rate,
            ..Self::default()
        }
    }

    /// Sets the free-form amount and unit columns.
    #[must_use]
    pub fn with_amount(mut self, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        self.amount = amount.into();
        self.unit = unit.into();
        self
    }

    /// Water content computed from the raw fields, ignoring any stored `water_in_kg`.
    #[must_use]
    pub fn raw_water_in_kg(&self) -> f64 {
        finite_or_zero(finite_or_zero(self.weight) * (finite_or_zero(self.moisture_percentage) / 100.0))
    }

    /// True when both ingredients carry the same raw inputs.
    #[must_use]
    pub fn same_raw_fields(&self, other: &Self) -> bool {
        self.name == other.name
            && self.amount == other.amount
            && self.unit == other.unit
            && self.weight.to_bits() == other.weight.to_bits()
            && self.moisture_percentage.to_bits() == other.moisture_percentage.to_bits()
            && self.rate.to_bits() == other.rate.to_bits()
    }
}

/// Raw recipe-level inputs edited alongside the ingredient list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterInputs {
    /// Target moisture of the finished product, percent of dry weight
    #[serde(default)]
    pub moisture_in_product: f64,
    /// Production loss buffer, percent
    #[serde(default)]
    pub allowance_percentage: f64,
    /// Target batch mass, kilograms
    #[serde(default)]
    pub production_quantity: f64,
}

/// Recipe-level quantities derived from the ingredient list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterConfiguration {
    /// Sum of ingredient weights
    pub total_weight: f64,
    /// Sum of water carried by the ingredients
    pub total_water_in_kg: f64,
    /// `total_weight - total_water_in_kg`
    pub final_dry_wt: f64,
    /// Water added back to reach the target product moisture
    pub moisture: f64,
    /// `final_dry_wt + moisture`
    pub final_output: f64,
    /// Final output after subtracting the allowance
    pub final_quantity: f64,
}

/// Reduces an ingredient list to its recipe-level quantities.
///
/// Water is taken from each ingredient's raw `weight * moisture_percentage`,
/// never from a previously stored `water_in_kg`, so the result reflects the
/// current raw inputs in a single pass. An empty list yields all zeros.
#[must_use]
pub fn compute_master_configuration(
    ingredients: &[Ingredient],
    moisture_in_product: f64,
    allowance_percentage: f64,
) -> MasterConfiguration {
    let total_weight = total_weight(ingredients);
    let total_water_in_kg = finite_or_zero(ingredients.iter().map(Ingredient::raw_water_in_kg).sum());

    let final_dry_wt = finite_or_zero(total_weight - total_water_in_kg);
    let moisture = finite_or_zero(finite_or_zero(moisture_in_product) / 100.0 * final_dry_wt);
    let final_output = finite_or_zero(final_dry_wt + moisture);
    let final_quantity =
        finite_or_zero(final_output * (1.0 - finite_or_zero(allowance_percentage) / 100.0));

    MasterConfiguration {
        total_weight,
        total_water_in_kg,
        final_dry_wt,
        moisture,
        final_output,
        final_quantity,
    }
}

/// Recomputes every ingredient's derived fields.
///
/// Returns a new list with the same length and order. Raw fields are copied
/// through untouched; derived fields are overwritten.
#[must_use]
pub fn compute_ingredient_totals(
    ingredients: &[Ingredient],
    final_output: f64,
    final_quantity: f64,
    production_quantity: f64,
    allowance_percentage: f64,
) -> Vec<Ingredient> {
    let total_weight = total_weight(ingredients);
    let production_quantity = finite_or_zero(production_quantity);
    let allowance_factor = 1.0 + finite_or_zero(allowance_percentage) / 100.0;

    ingredients
        .iter()
        .map(|ingredient| {
            let weight = finite_or_zero(ingredient.weight);
            let bom_qty_theoretical = ratio(weight, final_output) * production_quantity;
            let bom_qty_with_allowance = finite_or_zero(bom_qty_theoretical * allowance_factor);

            Ingredient {
                ingredient_percentage: percentage(weight, total_weight),
                bom_percentage: percentage(weight, final_output),
                water_in_kg: ingredient.raw_water_in_kg(),
                bom_with_allowance: percentage(weight, final_quantity),
                bom_qty_theoretical: finite_or_zero(bom_qty_theoretical),
                bom_qty_with_allowance,
                total_cost: finite_or_zero(finite_or_zero(ingredient.rate) * bom_qty_with_allowance),
                ..ingredient.clone()
            }
        })
        .collect()
}

/// Runs both passes in order: master configuration first, then ingredient totals.
#[must_use]
pub fn recalculate(
    ingredients: &[Ingredient],
    inputs: &MasterInputs,
) -> (MasterConfiguration, Vec<Ingredient>) {
    let master = compute_master_configuration(
        ingredients,
        inputs.moisture_in_product,
        inputs.allowance_percentage,
    );
    let totals = compute_ingredient_totals(
        ingredients,
        master.final_output,
        master.final_quantity,
        inputs.production_quantity,
        inputs.allowance_percentage,
    );
    (master, totals)
}

/// Sum of ingredient weights, treating non-finite weights as zero.
#[must_use]
pub fn total_weight(ingredients: &[Ingredient]) -> f64 {
    finite_or_zero(ingredients.iter().map(|i| finite_or_zero(i.weight)).sum())
}

/// Collapses `NaN`, infinities and negative zero to `0.0`.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    // `Sum` over an empty float iterator yields -0.0
    if value.is_finite() && value != 0.0 { value } else { 0.0 }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    finite_or_zero(ratio(part, whole) * 100.0)
}

/// Accepts a number, a numeric string, an empty string or `null`; anything that
/// does not parse to a finite number becomes `0.0`.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(finite_or_zero(number))
}

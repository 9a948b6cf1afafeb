//! BOM report generation.
//!
//! This module assembles a stored recipe's master configuration, ingredient rows
//! and a totals row into a structured report, and renders it as a fixed-width
//! text table. Values are reported as stored, not recalculated.

use crate::{
    core::{
        calculations::{Ingredient, MasterConfiguration, finite_or_zero},
        recipe,
    },
    entities::recipe as recipe_entity,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::fmt::Write as _;

/// Column sums shown beneath the ingredient table.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BomTotals {
    /// Sum of ingredient weights
    pub weight: f64,
    /// 100 when any weight is present, otherwise 0
    pub ingredient_percentage: f64,
    /// Sum of ingredient water
    pub water_in_kg: f64,
    /// Sum of ingredient costs
    pub total_cost: f64,
}

impl BomTotals {
    /// Sums the given ingredient rows.
    #[must_use]
    pub fn from_ingredients(ingredients: &[Ingredient]) -> Self {
        let weight = finite_or_zero(ingredients.iter().map(|i| i.weight).sum());
        Self {
            weight,
            ingredient_percentage: if weight > 0.0 { 100.0 } else { 0.0 },
            water_in_kg: finite_or_zero(ingredients.iter().map(|i| i.water_in_kg).sum()),
            total_cost: finite_or_zero(ingredients.iter().map(|i| i.total_cost).sum()),
        }
    }
}

/// A complete BOM report for one recipe.
#[derive(Debug, Clone)]
pub struct BomReport {
    /// The recipe being reported on
    pub recipe: recipe_entity::Model,
    /// Stored master configuration
    pub master: MasterConfiguration,
    /// Totals row
    pub totals: BomTotals,
}

impl BomReport {
    /// Builds a report from a stored recipe.
    #[must_use]
    pub fn from_recipe(recipe: recipe_entity::Model) -> Self {
        let master = recipe.master_configuration();
        let totals = BomTotals::from_ingredients(&recipe.ingredients.0);
        Self {
            recipe,
            master,
            totals,
        }
    }

    /// Ingredient rows in recipe order
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.recipe.ingredients.0
    }
}

/// Generates the BOM report for a recipe.
///
/// # Errors
/// Returns an error if the recipe does not exist or the query fails.
pub async fn generate_bom_report(db: &DatabaseConnection, recipe_id: i64) -> Result<BomReport> {
    let recipe = recipe::get_recipe(db, recipe_id).await?;
    Ok(BomReport::from_recipe(recipe))
}

const HEADERS: [&str; 11] = [
    "Name",
    "Weight",
    "Ing %",
    "BOM %",
    "Moisture %",
    "Water (Kg)",
    "Rate",
    "BOM w/Allow",
    "BOM Qty Theo",
    "BOM Qty w/Allow",
    "Total Cost",
];

/// Renders a report as plain text.
///
/// Weights and quantities use three decimals; percentages, rates and costs use two.
#[must_use]
pub fn format_bom_report(report: &BomReport) -> String {
    let recipe = &report.recipe;
    let master = &report.master;
    let mut out = String::new();

    let _ = writeln!(out, "Recipe: {}", recipe.name);
    if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "{description}");
    }

    out.push_str("\nMaster Configurations\n");
    let _ = writeln!(out, "  Moisture in Product: {:.2}%", recipe.moisture_in_product);
    let _ = writeln!(out, "  Final Dry Weight:    {:.2}", master.final_dry_wt);
    let _ = writeln!(out, "  Moisture:            {:.2}", master.moisture);
    let _ = writeln!(out, "  Final Output:        {:.2}", master.final_output);
    let _ = writeln!(out, "  Allowance:           {:.2}%", recipe.allowance_percentage);
    let _ = writeln!(out, "  Final Quantity:      {:.2}", master.final_quantity);
    let _ = writeln!(out, "  Production Quantity: {:.2} Kg", recipe.production_quantity);

    let mut rows: Vec<[String; 11]> = report
        .ingredients()
        .iter()
        .map(|i| {
            [
                i.name.clone(),
                format!("{:.3}", i.weight),
                format!("{:.2}", i.ingredient_percentage),
                format!("{:.2}", i.bom_percentage),
                format!("{:.2}", i.moisture_percentage),
                format!("{:.3}", i.water_in_kg),
                format!("{:.2}", i.rate),
                format!("{:.2}", i.bom_with_allowance),
                format!("{:.3}", i.bom_qty_theoretical),
                format!("{:.3}", i.bom_qty_with_allowance),
                format!("{:.2}", i.total_cost),
            ]
        })
        .collect();

    let totals = &report.totals;
    let dash = || "-".to_string();
    rows.push([
        "Totals".to_string(),
        format!("{:.2}", totals.weight),
        format!("{:.2}", totals.ingredient_percentage),
        dash(),
        dash(),
        format!("{:.2}", totals.water_in_kg),
        dash(),
        dash(),
        dash(),
        dash(),
        format!("{:.2}", totals.total_cost),
    ]);

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    out.push_str("\nIngredients\n");
    write_row(&mut out, &widths, HEADERS.iter().copied());
    for row in &rows {
        write_row(&mut out, &widths, row.iter().map(String::as_str));
    }

    if let Some(instructions) = recipe.instructions.as_deref().filter(|i| !i.is_empty()) {
        let _ = write!(out, "\nInstructions\n{instructions}\n");
    }

    out
}

fn write_row<'a>(out: &mut String, widths: &[usize; 11], cells: impl Iterator<Item = &'a str>) {
    let line = cells
        .zip(widths.iter().copied())
        .enumerate()
        .map(|(column, (cell, width))| {
            // Names are left-aligned, numbers right-aligned
            if column == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

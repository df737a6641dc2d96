// src/assemble.rs

//! Recipe assembly
//!
//! The detail fetch produces one flat row per (recipe x ingredient x step)
//! combination with outer-join semantics: ingredient and step fields may be
//! null. Folding walks the rows in order, captures recipe-level fields on
//! first sight, deduplicates ingredients by id and steps by position, and
//! emits steps ascending by position. A recipe that produced any row at
//! all appears in the output, even with zero ingredients or steps.

use crate::db::models::{DetailRow, cooking_time_label};
use crate::nutrition::{self, Nutrients, NutritionSummary, Per100g};
use serde::Serialize;
use std::collections::BTreeMap;

/// One assembled ingredient line with its nutrient contribution
#[derive(Debug, Clone, Serialize)]
pub struct AssembledIngredient {
    pub name: String,
    /// Quantity as written
    pub quantity: Option<String>,
    pub normalized_name: Option<String>,
    /// Quantity in grams; zero when the ingestion process could not
    /// normalize the written quantity
    pub grams: f64,
    /// Food category display name derived from the nutrient profile
    pub category: &'static str,
    pub nutrition: Nutrients,
}

/// A fully assembled recipe ready for display
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cooking_time: Option<&'static str>,
    pub serving_for: Option<String>,
    /// Guarded serving size, never zero
    pub serving_size: i64,
    pub published_at: Option<String>,
    pub ingredients: Vec<AssembledIngredient>,
    /// Step memos ascending by position
    pub steps: Vec<String>,
    pub nutrition: NutritionSummary,
}

struct PartialRecipe {
    id: i64,
    title: String,
    description: Option<String>,
    cooking_time: Option<&'static str>,
    serving_for: Option<String>,
    serving_size: i64,
    published_at: Option<String>,
    /// Keyed by ingredient id; first row per ingredient wins
    ingredients: BTreeMap<i64, AssembledIngredient>,
    /// Keyed by position; emitted in key order
    steps: BTreeMap<i64, String>,
    precomputed: Option<Nutrients>,
    calculated: Nutrients,
}

/// Fold flat detail rows into assembled recipes, input order preserved
pub fn fold_detail_rows(rows: &[DetailRow]) -> Vec<RecipeDetail> {
    let mut order = Vec::new();
    let mut partials: BTreeMap<i64, PartialRecipe> = BTreeMap::new();

    for row in rows {
        let partial = partials.entry(row.recipe_id).or_insert_with(|| {
            order.push(row.recipe_id);
            // The precomputed record's serving size is authoritative
            let serving_size = match row.total_serving_size.or(row.serving_size) {
                Some(n) if n > 0 => n,
                _ => 1,
            };
            PartialRecipe {
                id: row.recipe_id,
                title: row.title.clone(),
                description: row.description.clone(),
                cooking_time: row.cooking_time_code.and_then(cooking_time_label),
                serving_for: row.serving_for.clone(),
                serving_size,
                published_at: row.published_at.clone(),
                ingredients: BTreeMap::new(),
                steps: BTreeMap::new(),
                precomputed: row.total_calories.map(|_| Nutrients {
                    energy: row.total_calories.unwrap_or(0.0),
                    protein: row.total_protein.unwrap_or(0.0),
                    fat: row.total_fat.unwrap_or(0.0),
                    carbs: row.total_carbohydrates.unwrap_or(0.0),
                    fiber: row.total_fiber.unwrap_or(0.0),
                    salt: row.total_salt.unwrap_or(0.0),
                }),
                calculated: Nutrients::default(),
            }
        });

        if let Some(ingredient_id) = row.ingredient_id {
            if !partial.ingredients.contains_key(&ingredient_id) {
                let grams = row.normalized_quantity.unwrap_or(0.0);
                let profile = Per100g {
                    energy: row.energy_per_100g.unwrap_or(0.0),
                    protein: row.protein_per_100g.unwrap_or(0.0),
                    fat: row.fat_per_100g.unwrap_or(0.0),
                    carbohydrate: row.carbohydrate_per_100g.unwrap_or(0.0),
                    fiber: row.fiber_per_100g.unwrap_or(0.0),
                    salt: row.salt_per_100g.unwrap_or(0.0),
                };
                let contribution = nutrition::for_quantity(&profile, grams);

                if grams > 0.0 {
                    nutrition::accumulate(&mut partial.calculated, &contribution);
                }

                partial.ingredients.insert(
                    ingredient_id,
                    AssembledIngredient {
                        name: row.ingredient_name.clone().unwrap_or_default(),
                        quantity: row.quantity.clone(),
                        normalized_name: row.normalized_name.clone(),
                        grams,
                        category: nutrition::category_name(row.category_code.as_deref()),
                        nutrition: contribution,
                    },
                );
            }
        }

        if let (Some(position), Some(memo)) = (row.step_position, &row.step_memo) {
            partial.steps.entry(position).or_insert_with(|| memo.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|id| partials.remove(&id))
        .map(|partial| {
            // Precomputed totals are authoritative; the ingredient sum is
            // only the fallback and stays visible as a cross-check
            let totals = partial.precomputed.unwrap_or(partial.calculated);
            RecipeDetail {
                id: partial.id,
                title: partial.title,
                description: partial.description,
                cooking_time: partial.cooking_time,
                serving_for: partial.serving_for,
                serving_size: partial.serving_size,
                published_at: partial.published_at,
                ingredients: partial.ingredients.into_values().collect(),
                steps: partial.steps.into_values().collect(),
                nutrition: NutritionSummary::finalize(
                    totals,
                    partial.calculated,
                    partial.serving_size,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_row(recipe_id: i64) -> DetailRow {
        DetailRow {
            recipe_id,
            title: format!("recipe {recipe_id}"),
            description: None,
            cooking_time_code: None,
            serving_for: None,
            serving_size: None,
            published_at: None,
            ingredient_id: None,
            ingredient_name: None,
            quantity: None,
            normalized_name: None,
            normalized_quantity: None,
            category_code: None,
            energy_per_100g: None,
            protein_per_100g: None,
            fat_per_100g: None,
            carbohydrate_per_100g: None,
            fiber_per_100g: None,
            salt_per_100g: None,
            step_position: None,
            step_memo: None,
            total_serving_size: None,
            total_calories: None,
            total_protein: None,
            total_fat: None,
            total_carbohydrates: None,
            total_fiber: None,
            total_salt: None,
        }
    }

    fn with_ingredient(mut row: DetailRow, id: i64, name: &str, grams: f64) -> DetailRow {
        row.ingredient_id = Some(id);
        row.ingredient_name = Some(name.to_string());
        row.normalized_quantity = Some(grams);
        row
    }

    fn with_step(mut row: DetailRow, position: i64, memo: &str) -> DetailRow {
        row.step_position = Some(position);
        row.step_memo = Some(memo.to_string());
        row
    }

    #[test]
    fn test_recipe_without_joins_still_appears() {
        let details = fold_detail_rows(&[bare_row(1)]);
        assert_eq!(details.len(), 1);
        assert!(details[0].ingredients.is_empty());
        assert!(details[0].steps.is_empty());
    }

    #[test]
    fn test_ingredients_and_steps_deduplicated() {
        // The outer join repeats every ingredient for every step
        let rows = vec![
            with_step(with_ingredient(bare_row(1), 10, "onion", 100.0), 2, "simmer"),
            with_step(with_ingredient(bare_row(1), 10, "onion", 100.0), 1, "chop"),
            with_step(with_ingredient(bare_row(1), 11, "beef", 200.0), 2, "simmer"),
            with_step(with_ingredient(bare_row(1), 11, "beef", 200.0), 1, "chop"),
        ];

        let details = fold_detail_rows(&rows);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].ingredients.len(), 2);
        assert_eq!(details[0].steps, vec!["chop", "simmer"]);
    }

    #[test]
    fn test_serving_size_guard_in_fold() {
        let mut row = bare_row(1);
        row.serving_size = Some(0);
        row.total_calories = Some(500.0);

        let details = fold_detail_rows(&[row]);
        assert_eq!(details[0].serving_size, 1);
        assert!((details[0].nutrition.per_serving.energy - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_precomputed_totals_take_precedence() {
        let mut row = with_ingredient(bare_row(1), 10, "onion", 100.0);
        row.energy_per_100g = Some(33.0);
        row.total_calories = Some(400.0);

        let details = fold_detail_rows(&[row]);
        assert!((details[0].nutrition.totals.energy - 400.0).abs() < 1e-9);
        // The ingredient sum survives as the cross-check
        assert!((details[0].nutrition.calculated.energy - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_ingredient_sum_is_fallback_without_precomputed_record() {
        let mut row = with_ingredient(bare_row(1), 10, "onion", 200.0);
        row.energy_per_100g = Some(33.0);

        let details = fold_detail_rows(&[row]);
        assert!((details[0].nutrition.totals.energy - 66.0).abs() < 1e-9);
    }
}

// src/nutrition.rs

//! Nutrient aggregation
//!
//! Per-ingredient values are derived from per-100g profiles and gram
//! quantities. Recipe totals come from the precomputed
//! recipe_nutrition_info record when present; the ingredient-summed total
//! is kept only as a cross-check. Per-serving values divide by the guarded
//! serving size, and ratios compare each nutrient independently against
//! fixed daily standards.

use serde::Serialize;

/// A bundle of nutrient values. Units: kcal for energy, grams otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Nutrients {
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub salt: f64,
}

/// Fixed daily standards one serving is compared against
pub const DAILY_STANDARDS: Nutrients = Nutrients {
    energy: 734.0,
    protein: 31.0,
    fat: 21.0,
    carbs: 106.0,
    fiber: 7.0,
    salt: 2.5,
};

/// Per-100g profile of one ingredient, missing values treated as zero
#[derive(Debug, Clone, Copy, Default)]
pub struct Per100g {
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    /// Available carbohydrate, fiber excluded
    pub carbohydrate: f64,
    pub fiber: f64,
    pub salt: f64,
}

/// Nutrients contributed by `grams` of an ingredient.
///
/// Displayed carbs include fiber on top of the available carbohydrate.
pub fn for_quantity(profile: &Per100g, grams: f64) -> Nutrients {
    let factor = grams / 100.0;
    Nutrients {
        energy: profile.energy * factor,
        protein: profile.protein * factor,
        fat: profile.fat * factor,
        carbs: (profile.carbohydrate + profile.fiber) * factor,
        fiber: profile.fiber * factor,
        salt: profile.salt * factor,
    }
}

/// Accumulate `other` into `total`
pub fn accumulate(total: &mut Nutrients, other: &Nutrients) {
    total.energy += other.energy;
    total.protein += other.protein;
    total.fat += other.fat;
    total.carbs += other.carbs;
    total.fiber += other.fiber;
    total.salt += other.salt;
}

/// Per-serving values: total divided by the guarded serving size.
/// A null or zero serving size counts as one serving.
pub fn per_serving(total: &Nutrients, serving_size: i64) -> Nutrients {
    let servings = serving_size.max(1) as f64;
    Nutrients {
        energy: total.energy / servings,
        protein: total.protein / servings,
        fat: total.fat / servings,
        carbs: total.carbs / servings,
        fiber: total.fiber / servings,
        salt: total.salt / servings,
    }
}

/// Percentage of the daily standard one serving covers, per nutrient
pub fn ratios_to_standard(serving: &Nutrients) -> Nutrients {
    Nutrients {
        energy: serving.energy / DAILY_STANDARDS.energy * 100.0,
        protein: serving.protein / DAILY_STANDARDS.protein * 100.0,
        fat: serving.fat / DAILY_STANDARDS.fat * 100.0,
        carbs: serving.carbs / DAILY_STANDARDS.carbs * 100.0,
        fiber: serving.fiber / DAILY_STANDARDS.fiber * 100.0,
        salt: serving.salt / DAILY_STANDARDS.salt * 100.0,
    }
}

/// Bucket an unmapped or absent category code falls into
pub const FALLBACK_CATEGORY: &str = "other";

/// Map a two-digit food category code to its display name
pub fn category_name(code: Option<&str>) -> &'static str {
    match code {
        Some("01") => "cereals",
        Some("02") => "potatoes and starches",
        Some("03") => "sugars and sweeteners",
        Some("04") => "pulses",
        Some("05") => "nuts and seeds",
        Some("06") => "vegetables",
        Some("07") => "fruits",
        Some("08") => "mushrooms",
        Some("09") => "algae",
        Some("10") => "fish and shellfish",
        Some("11") => "meats",
        Some("12") => "eggs",
        Some("13") => "milk and dairy",
        Some("14") => "fats and oils",
        Some("15") => "confectionery",
        Some("16") => "beverages",
        Some("17") => "seasonings and spices",
        Some("18") => "prepared foods",
        _ => FALLBACK_CATEGORY,
    }
}

/// Full nutrition block of an assembled recipe
#[derive(Debug, Clone, Default, Serialize)]
pub struct NutritionSummary {
    /// Displayed totals: the precomputed record when present, otherwise
    /// the ingredient-summed values
    pub totals: Nutrients,
    /// Ingredient-summed totals, kept as a diagnostic cross-check
    pub calculated: Nutrients,
    pub per_serving: Nutrients,
    /// Percent of the daily standard covered by one serving
    pub ratios: Nutrients,
}

impl NutritionSummary {
    /// Finalize a summary from its totals and the serving size
    pub fn finalize(totals: Nutrients, calculated: Nutrients, serving_size: i64) -> Self {
        let serving = per_serving(&totals, serving_size);
        Self {
            totals,
            calculated,
            ratios: ratios_to_standard(&serving),
            per_serving: serving,
        }
    }
}

// src/db/models/nutrition.rs

//! Nutrient profile and precomputed per-recipe totals

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Per-100g nutrient values keyed by normalized ingredient name
#[derive(Debug, Clone)]
pub struct NutrientProfile {
    pub name: String,
    /// Two-digit food category code ("01".."18")
    pub category_code: Option<String>,
    pub energy_kcal: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    /// Available carbohydrate; fiber is stored separately
    pub carbohydrate: Option<f64>,
    pub fiber: Option<f64>,
    pub salt: Option<f64>,
}

impl NutrientProfile {
    /// Insert this profile into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO nutritions (name, category_code, energy_kcal, protein, fat, carbohydrate, fiber, salt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &self.name,
                &self.category_code,
                self.energy_kcal,
                self.protein,
                self.fat,
                self.carbohydrate,
                self.fiber,
                self.salt,
            ],
        )?;
        Ok(())
    }

    /// Find a profile by normalized ingredient name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT name, category_code, energy_kcal, protein, fat, carbohydrate, fiber, salt
             FROM nutritions WHERE name = ?1",
        )?;

        let profile = stmt.query_row([name], Self::from_row).optional()?;

        Ok(profile)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            category_code: row.get(1)?,
            energy_kcal: row.get(2)?,
            protein: row.get(3)?,
            fat: row.get(4)?,
            carbohydrate: row.get(5)?,
            fiber: row.get(6)?,
            salt: row.get(7)?,
        })
    }
}

/// Precomputed per-recipe nutrient totals from the ingestion process.
/// Authoritative for display; ingredient-summed totals are only a
/// cross-check.
#[derive(Debug, Clone)]
pub struct RecipeNutritionInfo {
    pub recipe_id: i64,
    pub serving_size: Option<i64>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fiber: Option<f64>,
    pub salt: Option<f64>,
}

impl RecipeNutritionInfo {
    /// Insert this record into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO recipe_nutrition_info (recipe_id, serving_size, calories, protein, fat, carbohydrates, fiber, salt)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.recipe_id,
                self.serving_size,
                self.calories,
                self.protein,
                self.fat,
                self.carbohydrates,
                self.fiber,
                self.salt,
            ],
        )?;
        Ok(())
    }

    /// Find the precomputed totals for a recipe
    pub fn find_by_recipe(conn: &Connection, recipe_id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT recipe_id, serving_size, calories, protein, fat, carbohydrates, fiber, salt
             FROM recipe_nutrition_info WHERE recipe_id = ?1",
        )?;

        let info = stmt
            .query_row([recipe_id], |row| {
                Ok(Self {
                    recipe_id: row.get(0)?,
                    serving_size: row.get(1)?,
                    calories: row.get(2)?,
                    protein: row.get(3)?,
                    fat: row.get(4)?,
                    carbohydrates: row.get(5)?,
                    fiber: row.get(6)?,
                    salt: row.get(7)?,
                })
            })
            .optional()?;

        Ok(info)
    }
}

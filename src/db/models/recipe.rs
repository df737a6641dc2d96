// src/db/models/recipe.rs

//! Recipe model - recipe-level metadata, summary fetches and the
//! outer-join detail fetch consumed by the assembler

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::collections::HashMap;

use super::sql_placeholders;

/// Cooking time code to display label
pub fn cooking_time_label(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("under 5 min"),
        2 => Some("about 10 min"),
        3 => Some("about 15 min"),
        4 => Some("about 30 min"),
        5 => Some("about 1 hour"),
        6 => Some("over 1 hour"),
        _ => None,
    }
}

/// One recipe row
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Coded cooking time, see [`cooking_time_label`]
    pub cooking_time_code: Option<i64>,
    /// Serving description as written ("serves 2-3")
    pub serving_for: Option<String>,
    /// Numeric serving count; null or 0 is treated as 1 wherever it divides
    pub serving_size: Option<i64>,
    /// Source corpus tag, free text in storage
    pub attribute: Option<String>,
    pub published_at: Option<String>,
}

/// Lightweight listing record handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub published_at: Option<String>,
}

impl Recipe {
    pub fn new(id: i64, title: String) -> Self {
        Self {
            id,
            title,
            description: None,
            cooking_time_code: None,
            serving_for: None,
            serving_size: None,
            attribute: None,
            published_at: None,
        }
    }

    /// Serving size with the null/zero guard applied
    pub fn effective_serving_size(&self) -> i64 {
        match self.serving_size {
            Some(n) if n > 0 => n,
            _ => 1,
        }
    }

    /// Insert this recipe into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO recipes (id, title, description, cooking_time, serving_for, serving_size, attribute, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.id,
                &self.title,
                &self.description,
                self.cooking_time_code,
                &self.serving_for,
                self.serving_size,
                &self.attribute,
                &self.published_at,
            ],
        )?;
        Ok(())
    }

    /// Find a recipe by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, cooking_time, serving_for, serving_size, attribute, published_at
             FROM recipes WHERE id = ?1",
        )?;

        let recipe = stmt.query_row([id], Self::from_row).optional()?;

        Ok(recipe)
    }

    /// Fetch listing summaries for an id set, preserving the order of `ids`.
    ///
    /// SQLite has no ORDER BY FIELD(), so the rows are reordered in memory
    /// against the requested list.
    pub fn fetch_summaries(conn: &Connection, ids: &[i64]) -> Result<Vec<RecipeSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, title, description, published_at FROM recipes WHERE id IN ({})",
            sql_placeholders(ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

        let mut by_id: HashMap<i64, RecipeSummary> = stmt
            .query_map(params.as_slice(), |row| {
                Ok(RecipeSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    published_at: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Fetch (id, attribute) pairs for an id set, preserving the order of `ids`
    pub fn fetch_attributes(conn: &Connection, ids: &[i64]) -> Result<Vec<(i64, Option<String>)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, attribute FROM recipes WHERE id IN ({})",
            sql_placeholders(ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

        let mut by_id: HashMap<i64, Option<String>> = stmt
            .query_map(params.as_slice(), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .collect();

        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id).map(|attr| (*id, attr)))
            .collect())
    }

    /// Outer-join detail fetch: one row per (recipe x ingredient x step)
    /// combination, nutrient profile and precomputed totals attached.
    /// Rows may carry null ingredient or null step fields.
    pub fn fetch_detail_rows(conn: &Connection, id: i64) -> Result<Vec<DetailRow>> {
        let mut stmt = conn.prepare(
            "SELECT
                r.id, r.title, r.description, r.cooking_time, r.serving_for,
                r.serving_size, r.published_at,
                i.id, i.name, i.quantity, i.normalized_name, i.normalized_quantity,
                n.category_code, n.energy_kcal, n.protein, n.fat,
                n.carbohydrate, n.fiber, n.salt,
                s.position, s.memo,
                rni.serving_size, rni.calories, rni.protein, rni.fat,
                rni.carbohydrates, rni.fiber, rni.salt
             FROM recipes AS r
             LEFT JOIN ingredients AS i ON r.id = i.recipe_id
             LEFT JOIN steps AS s ON r.id = s.recipe_id
             LEFT JOIN nutritions AS n ON i.normalized_name = n.name
             LEFT JOIN recipe_nutrition_info AS rni ON r.id = rni.recipe_id
             WHERE r.id = ?1
             ORDER BY i.id, s.position ASC",
        )?;

        let rows = stmt
            .query_map([id], DetailRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Convert a database row to a Recipe
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            cooking_time_code: row.get(3)?,
            serving_for: row.get(4)?,
            serving_size: row.get(5)?,
            attribute: row.get(6)?,
            published_at: row.get(7)?,
        })
    }
}

/// One flat row of the detail outer join
#[derive(Debug, Clone)]
pub struct DetailRow {
    pub recipe_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub cooking_time_code: Option<i64>,
    pub serving_for: Option<String>,
    pub serving_size: Option<i64>,
    pub published_at: Option<String>,

    pub ingredient_id: Option<i64>,
    pub ingredient_name: Option<String>,
    pub quantity: Option<String>,
    pub normalized_name: Option<String>,
    pub normalized_quantity: Option<f64>,

    pub category_code: Option<String>,
    pub energy_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub carbohydrate_per_100g: Option<f64>,
    pub fiber_per_100g: Option<f64>,
    pub salt_per_100g: Option<f64>,

    pub step_position: Option<i64>,
    pub step_memo: Option<String>,

    pub total_serving_size: Option<i64>,
    pub total_calories: Option<f64>,
    pub total_protein: Option<f64>,
    pub total_fat: Option<f64>,
    pub total_carbohydrates: Option<f64>,
    pub total_fiber: Option<f64>,
    pub total_salt: Option<f64>,
}

impl DetailRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            recipe_id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            cooking_time_code: row.get(3)?,
            serving_for: row.get(4)?,
            serving_size: row.get(5)?,
            published_at: row.get(6)?,
            ingredient_id: row.get(7)?,
            ingredient_name: row.get(8)?,
            quantity: row.get(9)?,
            normalized_name: row.get(10)?,
            normalized_quantity: row.get(11)?,
            category_code: row.get(12)?,
            energy_per_100g: row.get(13)?,
            protein_per_100g: row.get(14)?,
            fat_per_100g: row.get(15)?,
            carbohydrate_per_100g: row.get(16)?,
            fiber_per_100g: row.get(17)?,
            salt_per_100g: row.get(18)?,
            step_position: row.get(19)?,
            step_memo: row.get(20)?,
            total_serving_size: row.get(21)?,
            total_calories: row.get(22)?,
            total_protein: row.get(23)?,
            total_fat: row.get(24)?,
            total_carbohydrates: row.get(25)?,
            total_fiber: row.get(26)?,
            total_salt: row.get(27)?,
        })
    }
}

// src/db/models/standard.rs

//! Standard recipe models - aggregate "typical recipe" statistics per
//! dish category, used by the statistical search mode

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::sql_placeholders;

/// One aggregate dish category ("typical curry", "typical potato salad")
#[derive(Debug, Clone)]
pub struct StandardRecipe {
    pub id: i64,
    /// Category display name
    pub category_medium: String,
    /// Number of concrete recipes folded into this aggregate
    pub recipe_count: i64,
    pub cooking_time: Option<String>,
    pub average_steps: Option<f64>,
}

impl StandardRecipe {
    /// Insert this standard recipe into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO standard_recipes (id, category_medium, recipe_count, cooking_time, average_steps)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.id,
                &self.category_medium,
                self.recipe_count,
                &self.cooking_time,
                self.average_steps,
            ],
        )?;
        Ok(())
    }

    /// Find a standard recipe by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, category_medium, recipe_count, cooking_time, average_steps
             FROM standard_recipes WHERE id = ?1",
        )?;

        let recipe = stmt.query_row([id], Self::from_row).optional()?;

        Ok(recipe)
    }

    /// Fetch standard recipes for an id set (storage order; callers reorder)
    pub fn fetch_by_ids(conn: &Connection, ids: &[i64]) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, category_medium, recipe_count, cooking_time, average_steps
             FROM standard_recipes WHERE id IN ({})",
            sql_placeholders(ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

        let recipes = stmt
            .query_map(params.as_slice(), Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Category-name search: every inclusion must match as a substring,
    /// every exclusion must not. Most popular categories first.
    pub fn search_categories(
        conn: &Connection,
        inclusions: &[String],
        exclusions: &[String],
        limit: usize,
    ) -> Result<Vec<i64>> {
        if inclusions.is_empty() && exclusions.is_empty() {
            return Ok(Vec::new());
        }

        let mut conditions = Vec::new();
        let mut patterns = Vec::new();
        for keyword in inclusions {
            conditions.push(format!("category_medium LIKE ?{}", patterns.len() + 1));
            patterns.push(format!("%{keyword}%"));
        }
        for keyword in exclusions {
            conditions.push(format!("category_medium NOT LIKE ?{}", patterns.len() + 1));
            patterns.push(format!("%{keyword}%"));
        }

        let sql = format!(
            "SELECT id FROM standard_recipes WHERE {} ORDER BY recipe_count DESC LIMIT {}",
            conditions.join(" AND "),
            limit,
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            patterns.iter().map(|p| p as &dyn rusqlite::ToSql).collect();

        let ids = stmt
            .query_map(params.as_slice(), |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            category_medium: row.get(1)?,
            recipe_count: row.get(2)?,
            cooking_time: row.get(3)?,
            average_steps: row.get(4)?,
        })
    }
}

/// Occurrence count of one ingredient name within one standard recipe
#[derive(Debug, Clone)]
pub struct StandardIngredientStat {
    pub standard_recipe_id: i64,
    pub group_name: Option<String>,
    pub ingredient_name: String,
    pub count: i64,
}

impl StandardIngredientStat {
    /// Insert this statistic into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO standard_recipe_ingredients (standard_recipe_id, group_name, ingredient_name, count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                self.standard_recipe_id,
                &self.group_name,
                &self.ingredient_name,
                self.count,
            ],
        )?;
        Ok(())
    }

    /// (standard_recipe_id, count) pairs for an exact ingredient name
    pub fn matches_by_name(conn: &Connection, name: &str) -> Result<Vec<(i64, i64)>> {
        let mut stmt = conn.prepare_cached(
            "SELECT standard_recipe_id, count FROM standard_recipe_ingredients
             WHERE ingredient_name = ?1",
        )?;

        let matches = stmt
            .query_map([name], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(matches)
    }

    /// (standard_recipe_id, count) pairs for a substring match, the
    /// fallback when a keyword resolves to no normalized name
    pub fn matches_by_substring(conn: &Connection, keyword: &str) -> Result<Vec<(i64, i64)>> {
        let mut stmt = conn.prepare_cached(
            "SELECT standard_recipe_id, count FROM standard_recipe_ingredients
             WHERE ingredient_name LIKE ?1",
        )?;

        let pattern = format!("%{keyword}%");
        let matches = stmt
            .query_map([pattern], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(matches)
    }

    /// All statistics rows for an id set
    pub fn for_recipe_ids(conn: &Connection, ids: &[i64]) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT standard_recipe_id, group_name, ingredient_name, count
             FROM standard_recipe_ingredients WHERE standard_recipe_id IN ({})",
            sql_placeholders(ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

        let stats = stmt
            .query_map(params.as_slice(), Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    /// Statistics rows for one standard recipe, highest count first
    pub fn for_recipe(conn: &Connection, id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT standard_recipe_id, group_name, ingredient_name, count
             FROM standard_recipe_ingredients
             WHERE standard_recipe_id = ?1 ORDER BY count DESC",
        )?;

        let stats = stmt
            .query_map([id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            standard_recipe_id: row.get(0)?,
            group_name: row.get(1)?,
            ingredient_name: row.get(2)?,
            count: row.get(3)?,
        })
    }
}

/// Frequency of one (food, action) pair in the step texts of a category
#[derive(Debug, Clone)]
pub struct StandardStepStat {
    pub standard_recipe_id: i64,
    pub food_name: Option<String>,
    pub action: Option<String>,
    pub count: i64,
}

impl StandardStepStat {
    /// Insert this statistic into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO standard_recipe_steps (standard_recipe_id, food_name, action, count)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                self.standard_recipe_id,
                &self.food_name,
                &self.action,
                self.count,
            ],
        )?;
        Ok(())
    }

    /// All step statistics for an id set, highest count first
    pub fn for_recipe_ids(conn: &Connection, ids: &[i64]) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT standard_recipe_id, food_name, action, count
             FROM standard_recipe_steps WHERE standard_recipe_id IN ({})
             ORDER BY count DESC",
            sql_placeholders(ids.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

        let stats = stmt
            .query_map(params.as_slice(), Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stats)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            standard_recipe_id: row.get(0)?,
            food_name: row.get(1)?,
            action: row.get(2)?,
            count: row.get(3)?,
        })
    }
}

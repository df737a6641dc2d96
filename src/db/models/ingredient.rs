// src/db/models/ingredient.rs

//! Ingredient model - free-text ingredient lines and the index scans
//! that drive candidate search

use crate::error::Result;
use rusqlite::{Connection, Row, params};
use std::collections::HashSet;

use super::sql_placeholders;

/// One ingredient line of a recipe. `name` is free text as written by the
/// recipe author, not a canonical ingredient name.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: Option<i64>,
    pub recipe_id: i64,
    pub name: String,
    /// Quantity as written ("2 cloves", "a pinch")
    pub quantity: Option<String>,
    /// Canonical ingredient name resolved offline by the ingestion process
    pub normalized_name: Option<String>,
    /// Quantity in grams resolved offline by the ingestion process
    pub normalized_quantity: Option<f64>,
}

impl Ingredient {
    pub fn new(recipe_id: i64, name: String) -> Self {
        Self {
            id: None,
            recipe_id,
            name,
            quantity: None,
            normalized_name: None,
            normalized_quantity: None,
        }
    }

    /// Insert this ingredient into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO ingredients (recipe_id, name, quantity, normalized_name, normalized_quantity)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.recipe_id,
                &self.name,
                &self.quantity,
                &self.normalized_name,
                self.normalized_quantity,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Forward range scan over the (name, recipe_id) covering index.
    ///
    /// Returns up to `limit` recipe ids with `recipe_id >= from_id`, in
    /// ascending id order. One such scan per synonym is the "scatter" half
    /// of the scatter-gather strategy; an `IN (...)` predicate over all
    /// synonyms would lose the index ordering.
    pub fn scan_recipe_ids(
        conn: &Connection,
        name: &str,
        from_id: i64,
        limit: usize,
    ) -> Result<Vec<i64>> {
        let mut stmt = conn.prepare_cached(
            "SELECT recipe_id FROM ingredients
             WHERE name = ?1 AND recipe_id >= ?2
             ORDER BY recipe_id ASC
             LIMIT ?3",
        )?;

        let ids = stmt
            .query_map(params![name, from_id, limit as i64], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Count ingredient rows with an exact name, for cardinality estimation
    pub fn count_by_name(conn: &Connection, name: &str) -> Result<i64> {
        let count = conn.query_row(
            "SELECT count(*) FROM ingredients WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Recipe ids among `candidates` whose ingredient names overlap `names`.
    ///
    /// The membership check is restricted to the candidate batch, never the
    /// whole table; this is the verifier half of the multi-concept AND scan.
    pub fn recipe_ids_among(
        conn: &Connection,
        names: &[String],
        candidates: &[i64],
    ) -> Result<HashSet<i64>> {
        if names.is_empty() || candidates.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!(
            "SELECT DISTINCT recipe_id FROM ingredients
             WHERE name IN ({})
             AND recipe_id IN ({})",
            sql_placeholders(names.len()),
            sql_placeholders_offset(candidates.len(), names.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(names.len() + candidates.len());
        for name in names {
            params.push(name);
        }
        for id in candidates {
            params.push(id);
        }

        let ids = stmt
            .query_map(params.as_slice(), |row| row.get(0))?
            .collect::<std::result::Result<HashSet<i64>, _>>()?;

        Ok(ids)
    }

    /// All recipe ids containing any of `names`, unordered.
    ///
    /// Used to build exclusion sets in whole-result search modes.
    pub fn recipe_ids_matching_any(conn: &Connection, names: &[String]) -> Result<HashSet<i64>> {
        if names.is_empty() {
            return Ok(HashSet::new());
        }

        let sql = format!(
            "SELECT DISTINCT recipe_id FROM ingredients WHERE name IN ({})",
            sql_placeholders(names.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            names.iter().map(|n| n as &dyn rusqlite::ToSql).collect();

        let ids = stmt
            .query_map(params.as_slice(), |row| row.get(0))?
            .collect::<std::result::Result<HashSet<i64>, _>>()?;

        Ok(ids)
    }

    /// Recipe ids whose ingredients cover every concept group, capped at
    /// `limit`. One grouped pass: a recipe qualifies when, among its rows
    /// matching any synonym, each group contributes at least one row.
    pub fn recipe_ids_matching_all_groups(
        conn: &Connection,
        groups: &[Vec<String>],
        limit: usize,
    ) -> Result<Vec<i64>> {
        if groups.is_empty() || groups.iter().any(|g| g.is_empty()) {
            return Ok(Vec::new());
        }

        let all_names: Vec<&String> = groups.iter().flatten().collect();

        let mut having = Vec::with_capacity(groups.len());
        let mut offset = all_names.len();
        for group in groups {
            having.push(format!(
                "SUM(CASE WHEN name IN ({}) THEN 1 ELSE 0 END) > 0",
                sql_placeholders_offset(group.len(), offset),
            ));
            offset += group.len();
        }

        let sql = format!(
            "SELECT recipe_id FROM ingredients
             WHERE name IN ({})
             GROUP BY recipe_id
             HAVING {}
             ORDER BY recipe_id ASC
             LIMIT {}",
            sql_placeholders(all_names.len()),
            having.join(" AND "),
            limit,
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::new();
        for name in &all_names {
            params.push(*name);
        }
        for group in groups {
            for name in group {
                params.push(name);
            }
        }

        let ids = stmt
            .query_map(params.as_slice(), |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;

        Ok(ids)
    }

    /// Convert a database row to an Ingredient
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            recipe_id: row.get(1)?,
            name: row.get(2)?,
            quantity: row.get(3)?,
            normalized_name: row.get(4)?,
            normalized_quantity: row.get(5)?,
        })
    }

    /// List all ingredient lines of one recipe
    pub fn list_for_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, recipe_id, name, quantity, normalized_name, normalized_quantity
             FROM ingredients WHERE recipe_id = ?1 ORDER BY id",
        )?;

        let rows = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

/// `?N+1, ?N+2, ...` placeholder list starting after `offset` parameters
fn sql_placeholders_offset(count: usize, offset: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", offset + i))
        .collect::<Vec<_>>()
        .join(", ")
}

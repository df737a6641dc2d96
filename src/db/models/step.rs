// src/db/models/step.rs

//! Step model - preparation steps, position-ordered per recipe

use crate::error::Result;
use rusqlite::{Connection, params};

/// One preparation step. `position` is unique per recipe and drives the
/// display order.
#[derive(Debug, Clone)]
pub struct Step {
    pub recipe_id: i64,
    pub position: i64,
    pub memo: Option<String>,
}

impl Step {
    pub fn new(recipe_id: i64, position: i64, memo: String) -> Self {
        Self {
            recipe_id,
            position,
            memo: Some(memo),
        }
    }

    /// Insert this step into the database
    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO steps (recipe_id, position, memo) VALUES (?1, ?2, ?3)",
            params![self.recipe_id, self.position, &self.memo],
        )?;
        Ok(())
    }

    /// List the steps of one recipe in display order
    pub fn list_for_recipe(conn: &Connection, recipe_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT recipe_id, position, memo FROM steps
             WHERE recipe_id = ?1 ORDER BY position ASC",
        )?;

        let steps = stmt
            .query_map([recipe_id], |row| {
                Ok(Self {
                    recipe_id: row.get(0)?,
                    position: row.get(1)?,
                    memo: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(steps)
    }
}

// src/db/schema.rs

//! Database schema definitions and migrations
//!
//! Defines the SQLite schema for the recipe corpus and provides a migration
//! system to evolve it over time. The corpus is created offline by a
//! separate ingestion process; the search path never mutates it.

use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the schema version tracking table
fn init_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    init_schema_version(conn)?;

    let version = conn
        .query_row(
            "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Apply all pending migrations to bring the database up to date
pub fn migrate(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;
    info!("Current schema version: {}", current_version);

    if current_version >= SCHEMA_VERSION {
        info!("Schema is up to date");
        return Ok(());
    }

    for version in (current_version + 1)..=SCHEMA_VERSION {
        info!("Applying migration to version {}", version);
        apply_migration(conn, version)?;
        set_schema_version(conn, version)?;
    }

    info!(
        "Schema migration complete. Now at version {}",
        SCHEMA_VERSION
    );
    Ok(())
}

/// Apply a specific migration version
fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(Error::InitError(format!(
            "unknown migration version: {version}"
        ))),
    }
}

/// Initial schema - Version 1
///
/// Creates all core tables:
/// - recipes: recipe-level metadata
/// - ingredients: free-text ingredient lines, many per recipe
/// - steps: preparation steps, position-ordered per recipe
/// - synonym_dictionary: ingredient spelling variants
/// - nutritions: per-100g nutrient profiles keyed by normalized name
/// - recipe_nutrition_info: precomputed per-recipe nutrient totals
/// - standard_recipes + statistics: aggregate "typical recipe" categories
fn migrate_v1(conn: &Connection) -> Result<()> {
    debug!("Creating schema version 1");

    conn.execute_batch(
        "
        -- Recipes: one row per recipe, ids assigned by the ingestion process
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            cooking_time INTEGER,
            serving_for TEXT,
            serving_size INTEGER,
            attribute TEXT,
            published_at TEXT
        );

        -- Ingredients: free-text lines; name is not canonical
        CREATE TABLE ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            quantity TEXT,
            normalized_name TEXT,
            normalized_quantity REAL,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id)
        );

        -- Covering index for the scatter scans: equality on name with
        -- ordered range access by recipe_id, no table lookup needed.
        CREATE INDEX idx_ingredients_name_recipe ON ingredients(name, recipe_id);
        CREATE INDEX idx_ingredients_recipe ON ingredients(recipe_id);

        -- Steps: position is unique per recipe and drives display order
        CREATE TABLE steps (
            recipe_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            memo TEXT,
            PRIMARY KEY (recipe_id, position),
            FOREIGN KEY (recipe_id) REFERENCES recipes(id)
        );

        -- Synonym dictionary: a normalized_name owns many synonym spellings.
        -- The id is monotonic; the globally smallest id per normalized_name
        -- fixes the canonical display representative.
        CREATE TABLE synonym_dictionary (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            normalized_name TEXT NOT NULL,
            synonym TEXT NOT NULL
        );

        CREATE INDEX idx_synonym_normalized ON synonym_dictionary(normalized_name);
        CREATE INDEX idx_synonym_synonym ON synonym_dictionary(synonym);

        -- Nutrient profiles per 100g, keyed by normalized ingredient name
        CREATE TABLE nutritions (
            name TEXT PRIMARY KEY,
            category_code TEXT,
            energy_kcal REAL,
            protein REAL,
            fat REAL,
            carbohydrate REAL,
            fiber REAL,
            salt REAL
        );

        -- Precomputed per-recipe totals; authoritative over ingredient sums
        CREATE TABLE recipe_nutrition_info (
            recipe_id INTEGER PRIMARY KEY,
            serving_size INTEGER,
            calories REAL,
            protein REAL,
            fat REAL,
            carbohydrates REAL,
            fiber REAL,
            salt REAL,
            FOREIGN KEY (recipe_id) REFERENCES recipes(id)
        );

        -- Standard recipes: one aggregate row per dish category
        CREATE TABLE standard_recipes (
            id INTEGER PRIMARY KEY,
            category_medium TEXT NOT NULL,
            recipe_count INTEGER NOT NULL DEFAULT 0,
            cooking_time TEXT,
            average_steps REAL
        );

        CREATE INDEX idx_standard_category ON standard_recipes(category_medium);

        -- Ingredient occurrence statistics per standard recipe
        CREATE TABLE standard_recipe_ingredients (
            standard_recipe_id INTEGER NOT NULL,
            group_name TEXT,
            ingredient_name TEXT NOT NULL,
            count INTEGER NOT NULL,
            FOREIGN KEY (standard_recipe_id) REFERENCES standard_recipes(id)
        );

        CREATE INDEX idx_standard_ingredients_name
            ON standard_recipe_ingredients(ingredient_name);
        CREATE INDEX idx_standard_ingredients_recipe
            ON standard_recipe_ingredients(standard_recipe_id);

        -- Step action/food-name frequencies per standard recipe
        CREATE TABLE standard_recipe_steps (
            standard_recipe_id INTEGER NOT NULL,
            food_name TEXT,
            action TEXT,
            count INTEGER NOT NULL,
            FOREIGN KEY (standard_recipe_id) REFERENCES standard_recipes(id)
        );

        CREATE INDEX idx_standard_steps_recipe
            ON standard_recipe_steps(standard_recipe_id);
        ",
    )?;

    debug!("Schema version 1 created");
    Ok(())
}

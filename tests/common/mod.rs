// tests/common/mod.rs

//! Shared test utilities and fixtures for integration tests.

use kondate::db;
use kondate::db::models::{Ingredient, Recipe, RecipeNutritionInfo, Step, SynonymEntry};
use rusqlite::Connection;
use tempfile::TempDir;

/// Create an empty test database.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_test_db() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    (temp_dir, db_path)
}

/// Insert a recipe with the given ingredient names and a cookpad source
/// attribute, so sampled searches accept it.
#[allow(dead_code)]
pub fn add_recipe(conn: &Connection, id: i64, title: &str, ingredients: &[&str]) {
    let mut recipe = Recipe::new(id, title.to_string());
    recipe.attribute = Some("cookpad".to_string());
    recipe.serving_size = Some(2);
    recipe.insert(conn).unwrap();

    for name in ingredients {
        Ingredient::new(id, name.to_string()).insert(conn).unwrap();
    }
}

/// Register `synonyms` under a normalized name. Insertion order fixes the
/// canonical representative (first insert = smallest id).
pub fn add_synonyms(conn: &Connection, normalized: &str, synonyms: &[&str]) {
    for synonym in synonyms {
        SynonymEntry::new(normalized.to_string(), synonym.to_string())
            .insert(conn)
            .unwrap();
    }
}

/// Attach steps in the given (position, memo) order
#[allow(dead_code)]
pub fn add_steps(conn: &Connection, recipe_id: i64, steps: &[(i64, &str)]) {
    for (position, memo) in steps {
        Step::new(recipe_id, *position, memo.to_string())
            .insert(conn)
            .unwrap();
    }
}

/// Attach a precomputed nutrition record
#[allow(dead_code)]
pub fn add_nutrition_info(conn: &Connection, recipe_id: i64, serving_size: i64, calories: f64) {
    RecipeNutritionInfo {
        recipe_id,
        serving_size: Some(serving_size),
        calories: Some(calories),
        protein: Some(20.0),
        fat: Some(10.0),
        carbohydrates: Some(60.0),
        fiber: Some(5.0),
        salt: Some(2.0),
    }
    .insert(conn)
    .unwrap();
}

// src/db/models/mod.rs

//! Data models for the recipe corpus
//!
//! This module defines Rust structs that correspond to database tables
//! and provides the query methods the search pipeline is built from.

mod ingredient;
mod nutrition;
mod recipe;
mod standard;
mod step;
mod synonym;

pub use ingredient::Ingredient;
pub use nutrition::{NutrientProfile, RecipeNutritionInfo};
pub use recipe::{DetailRow, Recipe, RecipeSummary, cooking_time_label};
pub use standard::{StandardIngredientStat, StandardRecipe, StandardStepStat};
pub use step::Step;
pub use synonym::SynonymEntry;

/// `?1, ?2, ...` placeholder list for dynamic IN clauses
pub(crate) fn sql_placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use rusqlite::Connection;
    use std::collections::HashSet;
    use tempfile::NamedTempFile;

    fn create_test_db() -> (NamedTempFile, Connection) {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = Connection::open(temp_file.path()).unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        schema::migrate(&conn).unwrap();
        (temp_file, conn)
    }

    fn add_recipe(conn: &Connection, id: i64, title: &str, ingredients: &[&str]) {
        Recipe::new(id, title.to_string()).insert(conn).unwrap();
        for name in ingredients {
            Ingredient::new(id, name.to_string()).insert(conn).unwrap();
        }
    }

    #[test]
    fn test_recipe_crud() {
        let (_temp, conn) = create_test_db();

        let mut recipe = Recipe::new(42, "Beef stew".to_string());
        recipe.description = Some("Slow-cooked".to_string());
        recipe.cooking_time_code = Some(6);
        recipe.serving_size = Some(4);
        recipe.insert(&conn).unwrap();

        let found = Recipe::find_by_id(&conn, 42).unwrap().unwrap();
        assert_eq!(found.title, "Beef stew");
        assert_eq!(found.cooking_time_code, Some(6));
        assert_eq!(found.effective_serving_size(), 4);

        assert!(Recipe::find_by_id(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn test_effective_serving_size_guard() {
        let mut recipe = Recipe::new(1, "x".to_string());
        assert_eq!(recipe.effective_serving_size(), 1);
        recipe.serving_size = Some(0);
        assert_eq!(recipe.effective_serving_size(), 1);
        recipe.serving_size = Some(3);
        assert_eq!(recipe.effective_serving_size(), 3);
    }

    #[test]
    fn test_fetch_summaries_preserves_order() {
        let (_temp, conn) = create_test_db();
        for id in [1, 2, 3] {
            add_recipe(&conn, id, &format!("recipe {id}"), &[]);
        }

        let summaries = Recipe::fetch_summaries(&conn, &[3, 1, 2]).unwrap();
        let ids: Vec<i64> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        // Unknown ids are skipped, not errors
        let summaries = Recipe::fetch_summaries(&conn, &[2, 99]).unwrap();
        assert_eq!(summaries.len(), 1);
    }

    #[test]
    fn test_ingredient_scan_is_bounded_and_ordered() {
        let (_temp, conn) = create_test_db();
        for id in 1..=8 {
            add_recipe(&conn, id, "r", &["onion"]);
        }

        let ids = Ingredient::scan_recipe_ids(&conn, "onion", 3, 4).unwrap();
        assert_eq!(ids, vec![3, 4, 5, 6]);
        assert!(ids.iter().all(|&id| id >= 3));

        let ids = Ingredient::scan_recipe_ids(&conn, "onion", 100, 4).unwrap();
        assert!(ids.is_empty());

        assert_eq!(Ingredient::count_by_name(&conn, "onion").unwrap(), 8);
        assert_eq!(Ingredient::count_by_name(&conn, "leek").unwrap(), 0);
    }

    #[test]
    fn test_ingredient_membership_restricted_to_batch() {
        let (_temp, conn) = create_test_db();
        add_recipe(&conn, 1, "a", &["onion", "beef"]);
        add_recipe(&conn, 2, "b", &["onion"]);
        add_recipe(&conn, 3, "c", &["beef"]);

        let names = vec!["beef".to_string()];
        let kept = Ingredient::recipe_ids_among(&conn, &names, &[1, 2]).unwrap();
        assert_eq!(kept, HashSet::from([1]));

        // Recipe 3 matches but is outside the batch
        assert!(!kept.contains(&3));
    }

    #[test]
    fn test_ingredient_matching_all_groups() {
        let (_temp, conn) = create_test_db();
        add_recipe(&conn, 1, "a", &["onion", "beef"]);
        add_recipe(&conn, 2, "b", &["onion"]);
        add_recipe(&conn, 3, "c", &["shallot", "beef"]);

        let groups = vec![
            vec!["onion".to_string(), "shallot".to_string()],
            vec!["beef".to_string()],
        ];
        let ids = Ingredient::recipe_ids_matching_all_groups(&conn, &groups, 100).unwrap();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_step_order() {
        let (_temp, conn) = create_test_db();
        add_recipe(&conn, 1, "a", &[]);
        Step::new(1, 2, "simmer".to_string()).insert(&conn).unwrap();
        Step::new(1, 1, "chop".to_string()).insert(&conn).unwrap();

        let steps = Step::list_for_recipe(&conn, 1).unwrap();
        let memos: Vec<_> = steps.iter().map(|s| s.memo.clone().unwrap()).collect();
        assert_eq!(memos, vec!["chop", "simmer"]);
    }

    #[test]
    fn test_synonym_lookups() {
        let (_temp, conn) = create_test_db();
        SynonymEntry::new("onion".to_string(), "yellow onion".to_string())
            .insert(&conn)
            .unwrap();
        SynonymEntry::new("onion".to_string(), "brown onion".to_string())
            .insert(&conn)
            .unwrap();

        let syns = SynonymEntry::synonyms_of(&conn, "onion").unwrap();
        assert_eq!(syns.len(), 2);

        assert!(SynonymEntry::is_normalized_name(&conn, "onion").unwrap());
        assert!(!SynonymEntry::is_normalized_name(&conn, "yellow onion").unwrap());

        assert_eq!(
            SynonymEntry::normalized_name_of(&conn, "brown onion").unwrap(),
            Some("onion".to_string())
        );
        assert_eq!(SynonymEntry::normalized_name_of(&conn, "leek").unwrap(), None);
    }

    #[test]
    fn test_canonical_representative_is_smallest_id() {
        let (_temp, conn) = create_test_db();
        SynonymEntry::new("onion".to_string(), "yellow onion".to_string())
            .insert(&conn)
            .unwrap();
        SynonymEntry::new("onion".to_string(), "brown onion".to_string())
            .insert(&conn)
            .unwrap();

        let wanted = HashSet::from(["onion".to_string()]);
        let best = SynonymEntry::canonical_representatives(&conn, &wanted).unwrap();
        assert_eq!(best.get("onion"), Some(&"yellow onion".to_string()));
    }

    #[test]
    fn test_nutrition_models() {
        let (_temp, conn) = create_test_db();
        add_recipe(&conn, 1, "a", &[]);

        NutrientProfile {
            name: "onion".to_string(),
            category_code: Some("06".to_string()),
            energy_kcal: Some(33.0),
            protein: Some(1.0),
            fat: Some(0.1),
            carbohydrate: Some(7.0),
            fiber: Some(1.5),
            salt: Some(0.0),
        }
        .insert(&conn)
        .unwrap();

        let profile = NutrientProfile::find_by_name(&conn, "onion").unwrap().unwrap();
        assert_eq!(profile.category_code.as_deref(), Some("06"));

        RecipeNutritionInfo {
            recipe_id: 1,
            serving_size: Some(2),
            calories: Some(500.0),
            protein: Some(20.0),
            fat: Some(10.0),
            carbohydrates: Some(60.0),
            fiber: Some(5.0),
            salt: Some(2.0),
        }
        .insert(&conn)
        .unwrap();

        let info = RecipeNutritionInfo::find_by_recipe(&conn, 1).unwrap().unwrap();
        assert_eq!(info.calories, Some(500.0));
        assert!(RecipeNutritionInfo::find_by_recipe(&conn, 2).unwrap().is_none());
    }

    #[test]
    fn test_standard_category_search() {
        let (_temp, conn) = create_test_db();
        for (id, name, count) in [(1, "beef curry", 500), (2, "chicken curry", 900), (3, "beef stew", 100)] {
            StandardRecipe {
                id,
                category_medium: name.to_string(),
                recipe_count: count,
                cooking_time: None,
                average_steps: None,
            }
            .insert(&conn)
            .unwrap();
        }

        let ids = StandardRecipe::search_categories(&conn, &["curry".to_string()], &[], 5).unwrap();
        assert_eq!(ids, vec![2, 1]);

        let ids = StandardRecipe::search_categories(
            &conn,
            &["curry".to_string()],
            &["chicken".to_string()],
            5,
        )
        .unwrap();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_standard_ingredient_stats() {
        let (_temp, conn) = create_test_db();
        StandardRecipe {
            id: 1,
            category_medium: "curry".to_string(),
            recipe_count: 10,
            cooking_time: None,
            average_steps: None,
        }
        .insert(&conn)
        .unwrap();

        StandardIngredientStat {
            standard_recipe_id: 1,
            group_name: Some("vegetables".to_string()),
            ingredient_name: "onion".to_string(),
            count: 8,
        }
        .insert(&conn)
        .unwrap();

        let matches = StandardIngredientStat::matches_by_name(&conn, "onion").unwrap();
        assert_eq!(matches, vec![(1, 8)]);

        let matches = StandardIngredientStat::matches_by_substring(&conn, "nio").unwrap();
        assert_eq!(matches, vec![(1, 8)]);
    }
}

// src/search/standard.rs

//! Standard recipe search
//!
//! A "standard recipe" is a statistical aggregate of a dish category, not
//! a literal recipe: ingredient occurrence counts and step action
//! frequencies over every concrete recipe in the category. Two search
//! modes exist: by ingredient statistics (scored AND search) and by
//! category name (substring match ranked by popularity).

use crate::db::models::{StandardIngredientStat, StandardRecipe, StandardStepStat};
use crate::error::Result;
use crate::search::keywords::ParsedQuery;
use crate::search::synonyms;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use tracing::debug;

/// Number of standard recipes returned per search
pub const STANDARD_RESULT_LIMIT: usize = 5;

/// Which statistic a standard-recipe search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardSearchMode {
    /// Match ingredient occurrence statistics, AND across keywords
    Ingredient,
    /// Match the category name itself
    Recipe,
}

impl FromStr for StandardSearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ingredient" => Ok(StandardSearchMode::Ingredient),
            "recipe" => Ok(StandardSearchMode::Recipe),
            _ => Err(format!("Invalid standard search mode: {s}")),
        }
    }
}

/// One ingredient group of a standard recipe: per-name occurrence counts
/// and the group total
#[derive(Debug, Clone, Serialize)]
pub struct IngredientGroup {
    pub name: String,
    /// (ingredient name, occurrence count), highest count first
    pub items: Vec<(String, i64)>,
    pub total: i64,
}

/// A fully assembled standard recipe: category statistics ready for display
#[derive(Debug, Clone, Serialize)]
pub struct StandardRecipeGroup {
    pub id: i64,
    pub name: String,
    pub recipe_count: i64,
    pub cooking_time: Option<String>,
    pub average_steps: Option<f64>,
    /// Ingredient groups, largest total first
    pub ingredient_groups: Vec<IngredientGroup>,
    /// (food, action) frequencies, highest count first
    pub steps: Vec<StandardStep>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandardStep {
    pub food_name: Option<String>,
    pub action: Option<String>,
    pub count: i64,
}

/// Search standard recipes. Returns ranked (category name, group) pairs,
/// at most [`STANDARD_RESULT_LIMIT`] of them.
pub fn search_standard_recipes(
    conn: &Connection,
    query: &str,
    mode: StandardSearchMode,
) -> Result<Vec<(String, StandardRecipeGroup)>> {
    let parsed = ParsedQuery::parse(query);
    if parsed.is_empty() {
        return Ok(Vec::new());
    }

    let target_ids = match mode {
        StandardSearchMode::Ingredient => {
            search_by_ingredient_stats(conn, &parsed.inclusions, &parsed.exclusions)?
        }
        StandardSearchMode::Recipe => StandardRecipe::search_categories(
            conn,
            &parsed.inclusions,
            &parsed.exclusions,
            STANDARD_RESULT_LIMIT,
        )?,
    };

    debug!(?mode, targets = target_ids.len(), "standard search targets");
    if target_ids.is_empty() {
        return Ok(Vec::new());
    }

    let groups = assemble_groups(conn, &target_ids)?;
    Ok(groups
        .into_iter()
        .map(|group| (group.name.clone(), group))
        .collect())
}

/// Fetch one standard recipe by id, fully assembled
pub fn standard_recipe_details(
    conn: &Connection,
    id: i64,
) -> Result<Option<StandardRecipeGroup>> {
    let Some(recipe) = StandardRecipe::find_by_id(conn, id)? else {
        return Ok(None);
    };

    let stats = StandardIngredientStat::for_recipe(conn, id)?;
    let steps = StandardStepStat::for_recipe_ids(conn, &[id])?;

    Ok(Some(assemble_one(recipe, &stats, &steps)))
}

/// Ingredient-statistics mode: per keyword, collect {id: count} matches
/// (normalized-name equality, substring fallback for unresolvable
/// keywords); AND-intersect ids across keywords; score by summed counts;
/// subtract exclusion matches; top results by score.
fn search_by_ingredient_stats(
    conn: &Connection,
    inclusions: &[String],
    exclusions: &[String],
) -> Result<Vec<i64>> {
    if inclusions.is_empty() {
        return Ok(Vec::new());
    }

    let mut keyword_matches: Vec<HashMap<i64, i64>> = Vec::with_capacity(inclusions.len());
    for keyword in inclusions {
        let matches = stat_matches(conn, keyword)?;
        keyword_matches.push(matches.into_iter().collect());
    }

    // AND logic across keywords
    let mut common: HashSet<i64> = keyword_matches[0].keys().copied().collect();
    for matches in &keyword_matches[1..] {
        common.retain(|id| matches.contains_key(id));
    }
    if common.is_empty() {
        return Ok(Vec::new());
    }

    // Score: summed occurrence counts of the matched keywords
    let mut scored: Vec<(i64, i64)> = common
        .into_iter()
        .map(|id| {
            let score = keyword_matches
                .iter()
                .filter_map(|matches| matches.get(&id))
                .sum();
            (id, score)
        })
        .collect();

    // Highest score first; id breaks ties so results are stable
    scored.sort_by(|(id_a, score_a), (id_b, score_b)| {
        score_b.cmp(score_a).then(id_a.cmp(id_b))
    });

    if !exclusions.is_empty() {
        let mut excluded = HashSet::new();
        for keyword in exclusions {
            for (id, _) in stat_matches(conn, keyword)? {
                excluded.insert(id);
            }
        }
        scored.retain(|(id, _)| !excluded.contains(id));
    }

    Ok(scored
        .into_iter()
        .take(STANDARD_RESULT_LIMIT)
        .map(|(id, _)| id)
        .collect())
}

/// Matches for one keyword against the ingredient statistics
fn stat_matches(conn: &Connection, keyword: &str) -> Result<Vec<(i64, i64)>> {
    match synonyms::normalize(conn, keyword)? {
        Some(normalized) => StandardIngredientStat::matches_by_name(conn, &normalized),
        None => StandardIngredientStat::matches_by_substring(conn, keyword),
    }
}

/// Assemble display groups for an id set, preserving the order of `ids`
fn assemble_groups(conn: &Connection, ids: &[i64]) -> Result<Vec<StandardRecipeGroup>> {
    let recipes = StandardRecipe::fetch_by_ids(conn, ids)?;
    let stats = StandardIngredientStat::for_recipe_ids(conn, ids)?;
    let steps = StandardStepStat::for_recipe_ids(conn, ids)?;

    let mut by_id: HashMap<i64, StandardRecipe> =
        recipes.into_iter().map(|r| (r.id, r)).collect();

    let mut assembled = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(recipe) = by_id.remove(id) else {
            continue;
        };
        let own_stats: Vec<&StandardIngredientStat> = stats
            .iter()
            .filter(|s| s.standard_recipe_id == *id)
            .collect();
        let own_steps: Vec<&StandardStepStat> = steps
            .iter()
            .filter(|s| s.standard_recipe_id == *id)
            .collect();
        assembled.push(assemble_one_refs(recipe, &own_stats, &own_steps));
    }

    Ok(assembled)
}

fn assemble_one(
    recipe: StandardRecipe,
    stats: &[StandardIngredientStat],
    steps: &[StandardStepStat],
) -> StandardRecipeGroup {
    let stat_refs: Vec<&StandardIngredientStat> = stats.iter().collect();
    let step_refs: Vec<&StandardStepStat> = steps.iter().collect();
    assemble_one_refs(recipe, &stat_refs, &step_refs)
}

fn assemble_one_refs(
    recipe: StandardRecipe,
    stats: &[&StandardIngredientStat],
    steps: &[&StandardStepStat],
) -> StandardRecipeGroup {
    const FALLBACK_GROUP: &str = "other";

    // group name -> (name -> count), first-seen group order is irrelevant
    // because groups get re-sorted by total below
    let mut groups: Vec<IngredientGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for stat in stats {
        // Ingestion writes an "all" pseudo-row per group holding its
        // precomputed total; totals are recomputed here instead
        if stat.ingredient_name == "all" {
            continue;
        }

        let group_name = stat
            .group_name
            .clone()
            .unwrap_or_else(|| FALLBACK_GROUP.to_string());

        let slot = *index.entry(group_name.clone()).or_insert_with(|| {
            groups.push(IngredientGroup {
                name: group_name,
                items: Vec::new(),
                total: 0,
            });
            groups.len() - 1
        });

        groups[slot]
            .items
            .push((stat.ingredient_name.clone(), stat.count));
        groups[slot].total += stat.count;
    }

    for group in &mut groups {
        group
            .items
            .sort_by(|(name_a, count_a), (name_b, count_b)| {
                count_b.cmp(count_a).then(name_a.cmp(name_b))
            });
    }
    groups.sort_by(|a, b| b.total.cmp(&a.total).then(a.name.cmp(&b.name)));

    let steps = steps
        .iter()
        .map(|s| StandardStep {
            food_name: s.food_name.clone(),
            action: s.action.clone(),
            count: s.count,
        })
        .collect();

    StandardRecipeGroup {
        id: recipe.id,
        name: recipe.category_medium,
        recipe_count: recipe.recipe_count,
        cooking_time: recipe.cooking_time,
        average_steps: recipe.average_steps,
        ingredient_groups: groups,
        steps,
    }
}

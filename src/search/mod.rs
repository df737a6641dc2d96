// src/search/mod.rs

//! Search pipeline
//!
//! raw query -> keyword parse -> synonym unification and expansion ->
//! candidate search -> (sampling) -> summary fetch. Detail requests run
//! the outer-join fetch through the assembler instead.
//!
//! Every call is independent: the connection is the per-request storage
//! handle and no state survives between calls.

pub mod engine;
pub mod keywords;
pub mod sampler;
pub mod standard;
pub mod synonyms;

use crate::assemble::{self, RecipeDetail};
use crate::config::SearchSection;
use crate::db::models::{Recipe, RecipeSummary};
use crate::error::Result;
use keywords::ParsedQuery;
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;
use tracing::debug;

/// How a search finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The engine found as many results as requested
    Complete,
    /// The cursor was exhausted or a scan bound was hit; fewer results
    /// than requested is still success
    Partial,
    /// The query carried no usable terms
    NoQuery,
}

/// Sampled whole-result search output
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub recipes: Vec<RecipeSummary>,
    pub status: SearchStatus,
}

impl SearchOutcome {
    fn empty(status: SearchStatus) -> Self {
        Self {
            recipes: Vec::new(),
            status,
        }
    }
}

/// Expand inclusion terms into synonym concept groups: unify synonymous
/// keywords into one concept each, then take the closure of each concept.
fn concept_groups(conn: &Connection, inclusions: &[String]) -> Result<Vec<Vec<String>>> {
    let unified = synonyms::unify(conn, inclusions)?;
    unified
        .iter()
        .map(|term| synonyms::closure(conn, term))
        .collect()
}

/// Cursor-paginated ingredient search.
///
/// Returns up to `limit` summaries for recipes with id `>= from_id` whose
/// ingredients cover every inclusion concept. Exclusion terms are ignored
/// on this path; the bounded scan cannot subtract them without losing its
/// cost ceiling. The caller owns the cursor and any wraparound.
pub fn search_by_ingredients(
    conn: &Connection,
    query: &str,
    from_id: i64,
    limit: usize,
    tuning: &SearchSection,
) -> Result<Vec<RecipeSummary>> {
    let parsed = ParsedQuery::parse(query);
    if parsed.inclusions.is_empty() {
        return Ok(Vec::new());
    }

    let groups = concept_groups(conn, &parsed.inclusions)?;
    debug!(concepts = groups.len(), from_id, limit, "cursor search");

    let ids = if groups.len() == 1 {
        engine::scan_single_concept(conn, &groups[0], from_id, limit)?
    } else {
        engine::scan_intersection(
            conn,
            &groups,
            from_id,
            limit,
            tuning.batch_size,
            tuning.max_scan_candidates,
        )?
    };

    Recipe::fetch_summaries(conn, &ids)
}

/// Whole-result search with exclusion filtering and source-partitioned
/// sampling. The random source is injected for reproducibility.
pub fn search_sampled<R: Rng>(
    conn: &Connection,
    query: &str,
    tuning: &SearchSection,
    rng: &mut R,
) -> Result<SearchOutcome> {
    let parsed = ParsedQuery::parse(query);
    if parsed.inclusions.is_empty() {
        return Ok(SearchOutcome::empty(SearchStatus::NoQuery));
    }

    let groups = concept_groups(conn, &parsed.inclusions)?;

    // Exclusions are synonym-aware too: excluding one spelling excludes
    // the whole concept
    let exclusion_groups: Vec<Vec<String>> = parsed
        .exclusions
        .iter()
        .map(|term| synonyms::closure(conn, term))
        .collect::<Result<_>>()?;

    let candidate_ids =
        engine::find_all_matching(conn, &groups, &exclusion_groups, tuning.candidate_pool)?;
    debug!(candidates = candidate_ids.len(), "whole-result candidates");

    let attributes = Recipe::fetch_attributes(conn, &candidate_ids)?;
    let picked = sampler::sample_by_source(&attributes, tuning.oversample, tuning.page_size, rng);

    let status = if picked.len() >= tuning.page_size {
        SearchStatus::Complete
    } else {
        SearchStatus::Partial
    };

    Ok(SearchOutcome {
        recipes: Recipe::fetch_summaries(conn, &picked)?,
        status,
    })
}

/// Fetch one recipe fully assembled, nutrient aggregation included
pub fn get_recipe_details(conn: &Connection, id: i64) -> Result<Option<RecipeDetail>> {
    let rows = Recipe::fetch_detail_rows(conn, id)?;
    if rows.is_empty() {
        return Ok(None);
    }

    Ok(assemble::fold_detail_rows(&rows).into_iter().next())
}

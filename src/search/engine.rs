// src/search/engine.rs

//! Candidate search engine
//!
//! Finds recipe ids satisfying AND/OR/NOT over synonym-expanded concept
//! groups without ever scanning the full ingredient table. Two strategies:
//!
//! - single concept: one bounded range scan per synonym over the
//!   (name, recipe_id) covering index, merged and deduplicated
//!   ("scatter-gather")
//! - two or more concepts: the lowest-cardinality concept drives a batched
//!   cursor scan; the remaining concepts verify each batch with membership
//!   checks restricted to the batch ids
//!
//! No state persists between calls; the cursor is owned by the caller.

use crate::db::models::Ingredient;
use crate::error::Result;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace};

/// Driver batch size for the multi-concept AND scan
pub const BATCH_SIZE: usize = 1000;

/// Ceiling on candidates examined across all batches of one call. Hitting
/// it ends the scan with whatever has been found - a latency bound, not an
/// error.
pub const MAX_SCAN_CANDIDATES: usize = 10_000;

/// Single-concept cursor scan: scatter one bounded index scan per synonym,
/// gather by sort + dedupe + truncate.
///
/// Returned ids are ascending, unique, and all `>= from_id`.
pub fn scan_single_concept(
    conn: &Connection,
    synonyms: &[String],
    from_id: i64,
    limit: usize,
) -> Result<Vec<i64>> {
    let mut gathered = Vec::new();
    for synonym in synonyms {
        gathered.extend(Ingredient::scan_recipe_ids(conn, synonym, from_id, limit)?);
    }

    gathered.sort_unstable();
    gathered.dedup();
    gathered.truncate(limit);
    Ok(gathered)
}

/// Multi-concept AND scan with a caller-owned cursor.
///
/// The concept with the smallest estimated cardinality (summed per-synonym
/// row counts) becomes the driver; its batches are intersected against the
/// other concepts via batch-restricted membership checks. The scan ends
/// when `limit` ids are found, the driver is exhausted, or
/// `max_scan_candidates` driver candidates have been examined. Fewer than
/// `limit` results is a defined, non-error outcome.
///
/// Exclusion terms are deliberately not applied on this path; whole-result
/// modes subtract them instead.
pub fn scan_intersection(
    conn: &Connection,
    groups: &[Vec<String>],
    from_id: i64,
    limit: usize,
    batch_size: usize,
    max_scan_candidates: usize,
) -> Result<Vec<i64>> {
    if groups.is_empty() {
        return Ok(Vec::new());
    }
    if groups.len() == 1 {
        return scan_single_concept(conn, &groups[0], from_id, limit);
    }

    // Rarest first: estimate each concept's cardinality and sort
    let mut estimated: Vec<(i64, &Vec<String>)> = Vec::with_capacity(groups.len());
    for group in groups {
        let mut total = 0;
        for synonym in group {
            total += Ingredient::count_by_name(conn, synonym)?;
        }
        estimated.push((total, group));
    }
    estimated.sort_by_key(|(count, _)| *count);

    let driver = estimated[0].1;
    let verifiers: Vec<&Vec<String>> = estimated[1..].iter().map(|(_, g)| *g).collect();
    debug!(
        driver_cardinality = estimated[0].0,
        verifiers = verifiers.len(),
        "starting AND scan"
    );

    let mut found = Vec::new();
    let mut returned = HashSet::new();
    let mut cursor = from_id;
    let mut scanned = 0usize;

    while found.len() < limit && scanned < max_scan_candidates {
        // Scatter-gather one driver batch from the cursor
        let mut batch = Vec::new();
        for synonym in driver {
            batch.extend(Ingredient::scan_recipe_ids(conn, synonym, cursor, batch_size)?);
        }
        batch.sort_unstable();
        batch.dedup();
        batch.truncate(batch_size);

        let Some(&last_id) = batch.last() else {
            // Cursor exhausted; a short result is fine
            break;
        };
        scanned += batch.len();

        // Verify: intersect the batch with each remaining concept
        let mut matches: BTreeSet<i64> = batch.iter().copied().collect();
        for verifier in &verifiers {
            if matches.is_empty() {
                break;
            }
            let batch_ids: Vec<i64> = matches.iter().copied().collect();
            let kept = Ingredient::recipe_ids_among(conn, verifier, &batch_ids)?;
            matches.retain(|id| kept.contains(id));
        }

        for id in matches {
            if returned.insert(id) {
                found.push(id);
                if found.len() >= limit {
                    break;
                }
            }
        }

        trace!(cursor, scanned, found = found.len(), "AND scan batch done");
        cursor = last_id + 1;
    }

    if scanned >= max_scan_candidates && found.len() < limit {
        debug!(
            scanned,
            found = found.len(),
            "scan ceiling reached, returning partial result"
        );
    }

    Ok(found)
}

/// Whole-result search: every concept group must match, exclusion groups
/// must not. The candidate pool is capped at `pool_limit`; exclusion ids
/// are computed over the synonym-expanded exclusion groups and subtracted
/// before the caller samples the pool.
pub fn find_all_matching(
    conn: &Connection,
    groups: &[Vec<String>],
    exclusion_groups: &[Vec<String>],
    pool_limit: usize,
) -> Result<Vec<i64>> {
    let mut ids = Ingredient::recipe_ids_matching_all_groups(conn, groups, pool_limit)?;

    if !exclusion_groups.is_empty() && !ids.is_empty() {
        let mut excluded = HashSet::new();
        for group in exclusion_groups {
            excluded.extend(Ingredient::recipe_ids_matching_any(conn, group)?);
        }
        ids.retain(|id| !excluded.contains(id));
    }

    Ok(ids)
}

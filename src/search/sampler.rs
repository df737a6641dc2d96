// src/search/sampler.rs

//! Result sampling
//!
//! Recipes carry a source attribute; only two values are accepted for
//! display. One accepted source is picked per request, then a bounded
//! shuffle over the oversampled pool produces variety across repeated
//! identical searches without re-ranking the corpus. The random source is
//! injected so tests can seed it.

use crate::search::keywords::fold_width;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Source attribute values accepted for display
pub const ACCEPTED_SOURCES: [&str; 2] = ["cookpad", "rakuten"];

/// Partition candidates by source attribute and sample for display.
///
/// `candidates` are (recipe_id, raw attribute) pairs in candidate order.
/// A source is picked at random; if it has no candidates but the other
/// accepted source has some, the pick switches. If neither accepted source
/// is present the result is empty. The first `oversample` survivors are
/// shuffled and truncated to `display`.
pub fn sample_by_source<R: Rng>(
    candidates: &[(i64, Option<String>)],
    oversample: usize,
    display: usize,
    rng: &mut R,
) -> Vec<i64> {
    if candidates.is_empty() {
        return Vec::new();
    }

    // Attribute tags arrive in mixed widths; compare folded
    let folded: Vec<(i64, Option<String>)> = candidates
        .iter()
        .map(|(id, attr)| (*id, attr.as_deref().map(fold_width)))
        .collect();

    let available: Vec<&str> = ACCEPTED_SOURCES
        .iter()
        .copied()
        .filter(|source| {
            folded
                .iter()
                .any(|(_, attr)| attr.as_deref() == Some(*source))
        })
        .collect();

    if available.is_empty() {
        debug!("no candidates carry an accepted source attribute");
        return Vec::new();
    }

    let mut selected = match ACCEPTED_SOURCES.choose(rng) {
        Some(source) => *source,
        None => return Vec::new(),
    };
    if !available.contains(&selected) {
        selected = available[0];
        debug!(source = selected, "switched to the available source");
    }

    let mut pool: Vec<i64> = folded
        .iter()
        .filter(|(_, attr)| attr.as_deref() == Some(selected))
        .map(|(id, _)| *id)
        .collect();

    pool.truncate(oversample);
    pool.shuffle(rng);
    pool.truncate(display);
    pool
}

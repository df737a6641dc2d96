// src/search/synonyms.rs

//! Synonym resolution
//!
//! The dictionary relates canonical `normalized_name`s to their synonym
//! spellings. Three operations sit on top of it:
//! - [`normalize`]: term -> its canonical form, if known
//! - [`closure`]: term -> the full set of spellings naming the same concept
//! - [`unify`]: a keyword list -> one canonical display token per concept

use crate::db::models::SynonymEntry;
use crate::error::Result;
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Resolve a term to its normalized name.
///
/// A term that already occurs as a normalized_name is returned unchanged;
/// otherwise its synonym mapping is followed. Unknown terms yield `None`
/// and callers pass the literal term through - an unresolvable keyword
/// never fails the query.
pub fn normalize(conn: &Connection, term: &str) -> Result<Option<String>> {
    if SynonymEntry::is_normalized_name(conn, term)? {
        return Ok(Some(term.to_string()));
    }
    SynonymEntry::normalized_name_of(conn, term)
}

/// The synonym closure of a term: the term itself, plus every spelling
/// reachable in two hops across the normalized_name <-> synonym relation.
///
/// The two-hop bound assumes the dictionary is at most two layers deep.
/// A deeper relation would under-expand here; that assumption is a
/// property of the ingestion process, not checked at query time.
pub fn closure(conn: &Connection, term: &str) -> Result<Vec<String>> {
    let mut set = BTreeSet::new();
    set.insert(term.to_string());

    // Hop 1a: term as a normalized_name owning synonyms
    for synonym in SynonymEntry::synonyms_of(conn, term)? {
        set.insert(synonym);
    }

    // Hop 1b: term as a synonym of one or more normalized_names,
    // hop 2: the other synonyms of each such normalized_name
    for normalized in SynonymEntry::normalized_names_of(conn, term)? {
        for synonym in SynonymEntry::synonyms_of(conn, &normalized)? {
            set.insert(synonym);
        }
        set.insert(normalized);
    }

    Ok(set.into_iter().collect())
}

/// Collapse a keyword list so that each distinct concept appears once,
/// represented by its globally canonical spelling.
///
/// Keywords are resolved to normalized names and grouped by them,
/// first-occurrence order preserved. Each group is replaced by the synonym
/// with the smallest id over the entire dictionary. Unknown keywords pass
/// through individually, unaffected by grouping.
pub fn unify(conn: &Connection, keywords: &[String]) -> Result<Vec<String>> {
    if keywords.is_empty() {
        return Ok(Vec::new());
    }

    let resolved: Vec<Option<String>> = keywords
        .iter()
        .map(|kw| normalize(conn, kw))
        .collect::<Result<_>>()?;

    let wanted: HashSet<String> = resolved.iter().flatten().cloned().collect();
    let canonical = SynonymEntry::canonical_representatives(conn, &wanted)?;

    let mut unified = Vec::new();
    let mut seen_normals = HashSet::new();

    for (keyword, normalized) in keywords.iter().zip(&resolved) {
        match normalized {
            Some(normal) => {
                if seen_normals.insert(normal.clone()) {
                    match canonical.get(normal) {
                        Some(representative) => unified.push(representative.clone()),
                        // Normalized name with no dictionary rows of its
                        // own: the name itself is the best representative.
                        None => unified.push(normal.clone()),
                    }
                }
            }
            None => unified.push(keyword.clone()),
        }
    }

    debug!(input = keywords.len(), output = unified.len(), "unified keywords");
    Ok(unified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use tempfile::NamedTempFile;

    fn dict(entries: &[(&str, &str)]) -> (NamedTempFile, Connection) {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = Connection::open(temp_file.path()).unwrap();
        schema::migrate(&conn).unwrap();
        for (normalized, synonym) in entries {
            SynonymEntry::new(normalized.to_string(), synonym.to_string())
                .insert(&conn)
                .unwrap();
        }
        (temp_file, conn)
    }

    #[test]
    fn test_normalize() {
        let (_t, conn) = dict(&[("onion", "yellow onion"), ("onion", "brown onion")]);

        assert_eq!(normalize(&conn, "onion").unwrap(), Some("onion".to_string()));
        assert_eq!(
            normalize(&conn, "brown onion").unwrap(),
            Some("onion".to_string())
        );
        assert_eq!(normalize(&conn, "leek").unwrap(), None);
    }

    #[test]
    fn test_closure_always_contains_the_term() {
        let (_t, conn) = dict(&[("onion", "yellow onion")]);

        for term in ["onion", "yellow onion", "unheard-of"] {
            let set = closure(&conn, term).unwrap();
            assert!(set.contains(&term.to_string()), "closure must contain {term}");
        }
    }

    #[test]
    fn test_closure_covers_both_directions() {
        let (_t, conn) = dict(&[("onion", "yellow onion"), ("onion", "brown onion")]);

        // From the normalized name
        let set = closure(&conn, "onion").unwrap();
        assert_eq!(set, vec!["brown onion", "onion", "yellow onion"]);

        // From a synonym: one extra hop reaches the sibling spellings
        let set = closure(&conn, "brown onion").unwrap();
        assert_eq!(set, vec!["brown onion", "onion", "yellow onion"]);
    }

    #[test]
    fn test_closure_of_unknown_term_is_singleton() {
        let (_t, conn) = dict(&[]);
        assert_eq!(closure(&conn, "leek").unwrap(), vec!["leek"]);
    }

    #[test]
    fn test_unify_groups_synonymous_keywords() {
        let (_t, conn) = dict(&[("onion", "yellow onion"), ("onion", "brown onion")]);

        let keywords = vec!["brown onion".to_string(), "yellow onion".to_string()];
        let unified = unify(&conn, &keywords).unwrap();

        // One concept, represented by the smallest-id synonym
        assert_eq!(unified, vec!["yellow onion"]);
    }

    #[test]
    fn test_unify_is_deterministic() {
        let (_t, conn) = dict(&[("onion", "yellow onion"), ("onion", "brown onion")]);

        let keywords = vec!["onion".to_string(), "brown onion".to_string()];
        let first = unify(&conn, &keywords).unwrap();
        for _ in 0..5 {
            assert_eq!(unify(&conn, &keywords).unwrap(), first);
        }
    }

    #[test]
    fn test_unify_passes_unknown_terms_through() {
        let (_t, conn) = dict(&[("onion", "yellow onion")]);

        let keywords = vec!["leek".to_string(), "onion".to_string(), "leek".to_string()];
        let unified = unify(&conn, &keywords).unwrap();

        // Unknown terms are untouched by grouping, even duplicated ones
        assert_eq!(unified, vec!["leek", "yellow onion", "leek"]);
    }
}

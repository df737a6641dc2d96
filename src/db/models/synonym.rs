// src/db/models/synonym.rs

//! Synonym dictionary model
//!
//! A normalized_name owns many synonym spellings. A synonym string is
//! expected to map to one normalized_name, but the resolver tolerates
//! multiple and takes the union. The canonical display representative of a
//! normalized_name is the synonym with the globally smallest id among all
//! rows sharing that normalized_name.

use crate::error::Result;
use rusqlite::{Connection, params};
use std::collections::{HashMap, HashSet};

use super::sql_placeholders;

/// One synonym dictionary row
#[derive(Debug, Clone)]
pub struct SynonymEntry {
    pub id: Option<i64>,
    pub normalized_name: String,
    pub synonym: String,
}

impl SynonymEntry {
    pub fn new(normalized_name: String, synonym: String) -> Self {
        Self {
            id: None,
            normalized_name,
            synonym,
        }
    }

    /// Insert this entry into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO synonym_dictionary (normalized_name, synonym) VALUES (?1, ?2)",
            params![&self.normalized_name, &self.synonym],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// All synonym spellings registered under a normalized_name
    pub fn synonyms_of(conn: &Connection, normalized_name: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT synonym FROM synonym_dictionary WHERE normalized_name = ?1",
        )?;

        let synonyms = stmt
            .query_map([normalized_name], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(synonyms)
    }

    /// Every normalized_name a spelling is registered under.
    ///
    /// Usually zero or one; convergent spellings may yield several.
    pub fn normalized_names_of(conn: &Connection, synonym: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT normalized_name FROM synonym_dictionary WHERE synonym = ?1",
        )?;

        let names = stmt
            .query_map([synonym], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(names)
    }

    /// Whether a term occurs in the normalized_name column
    pub fn is_normalized_name(conn: &Connection, term: &str) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM synonym_dictionary WHERE normalized_name = ?1 LIMIT 1",
            [term],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// First normalized_name a spelling maps to, if any
    pub fn normalized_name_of(conn: &Connection, synonym: &str) -> Result<Option<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT normalized_name FROM synonym_dictionary WHERE synonym = ?1 LIMIT 1",
        )?;

        let mut rows = stmt.query_map([synonym], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(name) => Ok(Some(name?)),
            None => Ok(None),
        }
    }

    /// Canonical representative per normalized_name: the synonym carried by
    /// the row with the smallest id over the entire dictionary, not just
    /// the rows touched by the current query.
    pub fn canonical_representatives(
        conn: &Connection,
        normalized_names: &HashSet<String>,
    ) -> Result<HashMap<String, String>> {
        if normalized_names.is_empty() {
            return Ok(HashMap::new());
        }

        let names: Vec<&String> = normalized_names.iter().collect();
        let sql = format!(
            "SELECT normalized_name, synonym FROM synonym_dictionary
             WHERE normalized_name IN ({})
             ORDER BY id ASC",
            sql_placeholders(names.len()),
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            names.iter().map(|n| *n as &dyn rusqlite::ToSql).collect();

        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Rows arrive in ascending id order; the first synonym seen per
        // normalized_name wins.
        let mut best = HashMap::new();
        for (normalized, synonym) in rows {
            best.entry(normalized).or_insert(synonym);
        }

        Ok(best)
    }
}

// src/db/mod.rs

//! Database access layer
//!
//! The backing store is SQLite. A connection is the per-request storage
//! handle: acquired once, released by scope on every exit path. All row
//! types live in [`models`], the schema and its migrations in [`schema`].

pub mod models;
pub mod schema;

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Open an existing database
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    debug!("Opened database at {}", path.as_ref().display());
    Ok(conn)
}

/// Create the database and bring the schema up to date
pub fn init<P: AsRef<Path>>(path: P) -> Result<()> {
    let conn = open(path)?;
    schema::migrate(&conn)?;
    Ok(())
}

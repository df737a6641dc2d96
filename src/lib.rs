// src/lib.rs

//! Kondate Recipe Retrieval Engine
//!
//! Synonym-aware ingredient search over a large recipe corpus.
//!
//! # Architecture
//!
//! - Storage-first: the corpus lives in SQLite, written offline by an
//!   ingestion process and read-only on the search path
//! - Concepts: a search term plus its synonym closure; the same real-world
//!   ingredient appears under many spellings
//! - Cursor-bounded scans: candidates come from bounded range scans over a
//!   (name, recipe_id) covering index, never from full-table joins
//! - Driver/verifier AND search: the rarest concept generates candidate
//!   batches, the others verify membership within each batch
//! - Assembly: flat outer-join rows fold into nested recipe records with
//!   per-ingredient and per-serving nutrient aggregates

pub mod assemble;
pub mod config;
pub mod db;
mod error;
pub mod nutrition;
pub mod search;

pub use assemble::{AssembledIngredient, RecipeDetail};
pub use config::Config;
pub use db::models::RecipeSummary;
pub use error::{Error, Result};
pub use nutrition::{DAILY_STANDARDS, Nutrients, NutritionSummary};
pub use search::standard::{StandardRecipeGroup, StandardSearchMode};
pub use search::{SearchOutcome, SearchStatus};

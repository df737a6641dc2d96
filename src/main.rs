// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use kondate::config::Config;
use kondate::db;
use kondate::search::standard::StandardSearchMode;
use kondate::search::{self, SearchStatus};
use rand::Rng;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "kondate")]
#[command(author, version, about = "Synonym-aware recipe retrieval engine", long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults apply when absent
    #[arg(short, long, default_value = "kondate.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the recipe database schema
    Init,
    /// Search recipes by ingredient keywords ("onion beef -garlic")
    Search {
        /// Query string; `-` prefixes an excluded ingredient
        query: String,
        /// Start the cursor at this recipe id instead of a random one
        #[arg(long)]
        from: Option<i64>,
        /// Whole-result mode: exclusion-aware, source-partitioned sampling
        #[arg(long)]
        sampled: bool,
        /// Emit JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Search standard recipes (statistical dish categories)
    Standard {
        query: String,
        /// Match "ingredient" statistics or the "recipe" category name
        #[arg(long, default_value = "ingredient")]
        mode: String,
        #[arg(long)]
        json: bool,
    },
    /// Show one recipe with assembled ingredients, steps and nutrition
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Init => {
            info!("Initializing recipe database at: {}", config.database.path);
            db::init(&config.database.path)?;
            println!("Database initialized at: {}", config.database.path);
            Ok(())
        }
        Commands::Search {
            query,
            from,
            sampled,
            json,
        } => run_search(&config, &query, from, sampled, json),
        Commands::Standard { query, mode, json } => {
            let mode: StandardSearchMode = mode.parse().map_err(anyhow::Error::msg)?;
            let conn = db::open(&config.database.path)?;
            let results = search::standard::search_standard_recipes(&conn, &query, mode)?;

            if json {
                let groups: Vec<_> = results.iter().map(|(_, group)| group).collect();
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if results.is_empty() {
                println!("No standard recipes matched '{query}'");
            } else {
                for (name, group) in &results {
                    println!("{name} ({} recipes)", group.recipe_count);
                    for ingredient_group in &group.ingredient_groups {
                        println!("  [{}] {} mentions", ingredient_group.name, ingredient_group.total);
                    }
                }
            }
            Ok(())
        }
        Commands::Show { id, json } => {
            let conn = db::open(&config.database.path)?;
            match search::get_recipe_details(&conn, id)? {
                Some(detail) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&detail)?);
                    } else {
                        print_detail(&detail);
                    }
                    Ok(())
                }
                None => Err(kondate::Error::NotFound(format!("recipe {id}")).into()),
            }
        }
    }
}

/// Run a search, degrading to an empty listing when storage is unavailable
fn run_search(
    config: &Config,
    query: &str,
    from: Option<i64>,
    sampled: bool,
    json: bool,
) -> Result<()> {
    let conn = match db::open(&config.database.path) {
        Ok(conn) => conn,
        Err(e) => {
            warn!("storage unavailable: {e}");
            println!("Search unavailable: could not open the recipe database.");
            return Ok(());
        }
    };

    let mut rng = rand::thread_rng();
    let tuning = &config.search;

    let recipes = if sampled {
        let outcome = search::search_sampled(&conn, query, tuning, &mut rng)?;
        if outcome.status == SearchStatus::NoQuery {
            println!("Empty query.");
            return Ok(());
        }
        outcome.recipes
    } else {
        // Random cursor start for variety, one wraparound to fill the page
        let start_id = from.unwrap_or_else(|| rng.gen_range(1..=tuning.id_space));
        let mut recipes =
            search::search_by_ingredients(&conn, query, start_id, tuning.page_size, tuning)?;

        if recipes.len() < tuning.page_size && start_id > 1 {
            let needed = tuning.page_size - recipes.len();
            let more = search::search_by_ingredients(&conn, query, 1, needed, tuning)?;
            for summary in more {
                if !recipes.iter().any(|r| r.id == summary.id) {
                    recipes.push(summary);
                }
            }
        }
        recipes
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else if recipes.is_empty() {
        println!("No recipes matched '{query}'");
    } else {
        for recipe in &recipes {
            match &recipe.description {
                Some(description) => println!("{:>8}  {} - {}", recipe.id, recipe.title, description),
                None => println!("{:>8}  {}", recipe.id, recipe.title),
            }
        }
    }
    Ok(())
}

fn print_detail(detail: &kondate::RecipeDetail) {
    println!("{} (#{})", detail.title, detail.id);
    if let Some(description) = &detail.description {
        println!("{description}");
    }
    if let Some(cooking_time) = detail.cooking_time {
        println!("Cooking time: {cooking_time}");
    }
    println!("Serves: {}", detail.serving_size);

    println!("\nIngredients:");
    for ingredient in &detail.ingredients {
        match &ingredient.quantity {
            Some(quantity) => println!("  {} ({quantity}) [{}]", ingredient.name, ingredient.category),
            None => println!("  {} [{}]", ingredient.name, ingredient.category),
        }
    }

    println!("\nSteps:");
    for (index, memo) in detail.steps.iter().enumerate() {
        println!("  {}. {memo}", index + 1);
    }

    let nutrition = &detail.nutrition;
    println!("\nPer serving:");
    println!(
        "  energy {:.0} kcal ({:.0}%)  protein {:.1} g ({:.0}%)  fat {:.1} g ({:.0}%)  carbs {:.1} g ({:.0}%)",
        nutrition.per_serving.energy,
        nutrition.ratios.energy,
        nutrition.per_serving.protein,
        nutrition.ratios.protein,
        nutrition.per_serving.fat,
        nutrition.ratios.fat,
        nutrition.per_serving.carbs,
        nutrition.ratios.carbs,
    );
}

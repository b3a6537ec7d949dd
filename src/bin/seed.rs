//! Catalog seed script
//!
//! Seeds categories, ingredients, tools, three recipes with their compositions,
//! a few comments and one tagged article. Skips everything when categories already
//! exist, unless `--reset` is given.
//!
//! Usage:
//!   DATABASE_URL=... ./seed [--reset]

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::{postgres::PgPoolOptions, PgConnection};
use uuid::Uuid;

use mealplanner_api::db;

#[derive(Parser)]
#[command(name = "seed", about = "Seed the meal planner catalog with sample data")]
struct Args {
    /// Wipe the catalog (and every meal plan assignment referencing it) first
    #[arg(long)]
    reset: bool,
}

struct SeedRecipe {
    title: &'static str,
    preparation_time: i32,
    difficulty: i16,
    instructions: &'static str,
    category: &'static str,
    is_healthy: bool,
    compositions: &'static [(&'static str, f64, &'static str)],
    tools: &'static [&'static str],
    comment: (&'static str, &'static str),
}

const CATEGORIES: &[&str] = &["Starter", "Main", "Dessert"];
const INGREDIENTS: &[&str] = &["Flour", "Sugar", "Butter", "Chicken Breast", "Olive Oil"];
const TOOLS: &[&str] = &["Oven", "Whisk", "Salad Bowl"];

const RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Chocolate Cake",
        preparation_time: 60,
        difficulty: 3,
        instructions: "Mix the flour, sugar, and butter. Add eggs and bake at 180°C for 30 minutes.",
        category: "Dessert",
        is_healthy: false,
        compositions: &[("Flour", 200.0, "grams"), ("Sugar", 100.0, "grams"), ("Butter", 150.0, "grams")],
        tools: &["Oven", "Whisk"],
        comment: ("user_123", "This chocolate cake was amazing!"),
    },
    SeedRecipe {
        title: "Caesar Salad",
        preparation_time: 20,
        difficulty: 2,
        instructions: "Mix lettuce, grilled chicken breast, croutons, and Caesar dressing.",
        category: "Starter",
        is_healthy: true,
        compositions: &[("Chicken Breast", 1.0, "piece"), ("Olive Oil", 50.0, "milliliters")],
        tools: &["Salad Bowl"],
        comment: ("user_124", "The Caesar salad was fresh and delicious!"),
    },
    SeedRecipe {
        title: "Roast Chicken",
        preparation_time: 90,
        difficulty: 4,
        instructions: "Rub the chicken with olive oil, salt, and roast for 1.5 hours at 200°C.",
        category: "Main",
        is_healthy: true,
        compositions: &[("Chicken Breast", 2.0, "pieces"), ("Olive Oil", 30.0, "milliliters")],
        tools: &["Oven"],
        comment: ("user_125", "The roast chicken was a bit dry, but still tasty."),
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await?;

    let mut tx = pool.begin().await?;

    if args.reset {
        tracing::info!("Wiping catalog...");
        sqlx::query(
            "TRUNCATE comments, tag_articles, tags, articles, tool_recipes, compositions,
                      recipes, tools, ingredients, categories CASCADE",
        )
        .execute(&mut *tx)
        .await
        .context("Failed to wipe catalog")?;
    } else {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM categories")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tracing::info!("Catalog already seeded ({existing} categories), pass --reset to reseed");
            return Ok(());
        }
    }

    let categories = insert_named(&mut *tx, "categories", CATEGORIES).await?;
    let ingredients = insert_named(&mut *tx, "ingredients", INGREDIENTS).await?;
    let tools = insert_named(&mut *tx, "tools", TOOLS).await?;

    for recipe in RECIPES {
        let recipe_id: Uuid = sqlx::query_scalar(
            "INSERT INTO recipes
                 (title, preparation_time, difficulty, instructions, is_healthy, category_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(recipe.title)
        .bind(recipe.preparation_time)
        .bind(recipe.difficulty)
        .bind(recipe.instructions)
        .bind(recipe.is_healthy)
        .bind(lookup(&categories, recipe.category)?)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert recipe {}", recipe.title))?;

        for &(ingredient, quantity, unit) in recipe.compositions {
            sqlx::query(
                "INSERT INTO compositions (recipe_id, ingredient_id, quantity, measure_unity)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(recipe_id)
            .bind(lookup(&ingredients, ingredient)?)
            .bind(quantity)
            .bind(unit)
            .execute(&mut *tx)
            .await?;
        }

        for &tool in recipe.tools {
            sqlx::query("INSERT INTO tool_recipes (recipe_id, tool_id) VALUES ($1, $2)")
                .bind(recipe_id)
                .bind(lookup(&tools, tool)?)
                .execute(&mut *tx)
                .await?;
        }

        let (user_id, text) = recipe.comment;
        sqlx::query("INSERT INTO comments (text, user_id, recipe_id) VALUES ($1, $2, $3)")
            .bind(text)
            .bind(user_id)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;

        tracing::info!("Seeded recipe {}", recipe.title);
    }

    seed_article(&mut *tx).await?;

    tx.commit().await?;
    tracing::info!("Seed complete");
    Ok(())
}

async fn insert_named(
    conn: &mut PgConnection,
    table: &str,
    names: &[&'static str],
) -> Result<Vec<(&'static str, Uuid)>> {
    let mut ids = Vec::with_capacity(names.len());
    for &name in names {
        let id: Uuid =
            sqlx::query_scalar(&format!("INSERT INTO {table} (name) VALUES ($1) RETURNING id"))
                .bind(name)
                .fetch_one(&mut *conn)
                .await
                .with_context(|| format!("Failed to insert {name} into {table}"))?;
        ids.push((name, id));
    }
    tracing::info!("Seeded {} {table}", ids.len());
    Ok(ids)
}

fn lookup(ids: &[(&'static str, Uuid)], name: &str) -> Result<Uuid> {
    ids.iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| *id)
        .with_context(|| format!("Unknown seed reference: {name}"))
}

async fn seed_article(conn: &mut PgConnection) -> Result<()> {
    let article_id: Uuid = sqlx::query_scalar(
        "INSERT INTO articles (title, slug, text)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind("Planning a week of meals")
    .bind("planning-a-week-of-meals")
    .bind("Pick one starter, one main and one dessert per day, then shop once for the week.")
    .fetch_one(&mut *conn)
    .await
    .context("Failed to insert article")?;

    let tags = insert_named(conn, "tags", &["Planning", "Tips"]).await?;
    for (_, tag_id) in &tags {
        sqlx::query("INSERT INTO tag_articles (article_id, tag_id) VALUES ($1, $2)")
            .bind(article_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query("INSERT INTO comments (text, user_id, article_id) VALUES ($1, $2, $3)")
        .bind("Batch cooking on Sundays changed everything for us.")
        .bind("user_123")
        .bind(article_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

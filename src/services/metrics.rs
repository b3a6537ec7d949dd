use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Gauge,
};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters ───────────────────────────────────────────────────────
    pub static ref MEAL_PLANS_CREATED_COUNTER: Counter = register_counter!(
        "api_meal_plans_created_total",
        "Meal plans created"
    ).unwrap();

    pub static ref MEAL_PLAN_CONFLICTS_COUNTER: Counter = register_counter!(
        "api_meal_plan_conflicts_total",
        "Meal plan creations rejected because the date was already planned"
    ).unwrap();

    pub static ref COMMENTS_COUNTER: Counter = register_counter!(
        "api_comments_posted_total",
        "Recipe comments posted"
    ).unwrap();

    pub static ref NUTRITION_LOOKUPS_COUNTER: CounterVec = register_counter_vec!(
        "api_nutrition_lookups_total",
        "Nutrition API lookups by outcome",
        &["status"]
    ).unwrap();

    pub static ref IDENTITY_WEBHOOKS_COUNTER: CounterVec = register_counter_vec!(
        "api_identity_webhooks_total",
        "Identity provider webhook deliveries by event type",
        &["event"]
    ).unwrap();

    // ── Business metrics ─────────────────────────────────────────────────────
    pub static ref RECIPES_GAUGE: Gauge = register_gauge!(
        "mealplanner_recipes_total",
        "Recipes in the catalog"
    ).unwrap();

    pub static ref MEAL_PLANS_GAUGE: Gauge = register_gauge!(
        "mealplanner_meal_plans_total",
        "Stored meal plans"
    ).unwrap();

    pub static ref USERS_GAUGE: Gauge = register_gauge!(
        "mealplanner_users_total",
        "Mirrored identity-provider users"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let recipes: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM recipes")
        .fetch_one(pool)
        .await?;
    RECIPES_GAUGE.set(recipes as f64);

    let plans: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM meal_plans")
        .fetch_one(pool)
        .await?;
    MEAL_PLANS_GAUGE.set(plans as f64);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users")
        .fetch_one(pool)
        .await?;
    USERS_GAUGE.set(users as f64);

    info!("Metrics: collected ({recipes} recipes, {plans} meal plans, {users} users)");
    Ok(())
}

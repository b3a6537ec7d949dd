// Library exports for binary tools and tests
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use config::Config;
use services::nutrition::NutritionService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Connections are opened per request so Redis outages only disable rate limiting.
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub nutrition: Arc<NutritionService>,
}

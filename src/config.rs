use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub redis_url: String,
    /// Shared secret the identity provider signs session tokens with (HS256).
    pub jwt_secret: String,
    /// Expected value of the `X-Webhook-Secret` header on identity webhooks.
    pub webhook_secret: String,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    // Edamam nutrition API (optional)
    pub edamam_api_id: Option<String>,
    pub edamam_api_key: Option<String>,
    pub edamam_base_url: String,
    pub comment_rate_limit: u64,
    pub comment_rate_window_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. `from_env` feeds it the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|s| !s.is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| anyhow::anyhow!("Missing required env var: {}", key))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: optional("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "20".into())
                .parse()?,
            redis_url: optional("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".into()),
            jwt_secret: required("JWT_SECRET")?,
            webhook_secret: required("WEBHOOK_SECRET")?,
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: optional("PORT").unwrap_or_else(|| "8080".into()).parse()?,
            app_base_url: optional("APP_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            edamam_api_id: optional("EDAMAM_API_ID"),
            edamam_api_key: optional("EDAMAM_API_KEY"),
            edamam_base_url: optional("EDAMAM_BASE_URL")
                .unwrap_or_else(|| "https://api.edamam.com".into()),
            comment_rate_limit: optional("COMMENT_RATE_LIMIT")
                .unwrap_or_else(|| "5".into())
                .parse()?,
            comment_rate_window_secs: optional("COMMENT_RATE_WINDOW_SECS")
                .unwrap_or_else(|| "60".into())
                .parse()?,
        })
    }
}

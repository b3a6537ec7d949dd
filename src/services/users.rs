use sqlx::PgPool;

use crate::models::user::{Avatar, User, UserUpsert};

pub struct UserService;

impl UserService {
    /// Insert or refresh the local mirror of an identity-provider account.
    pub async fn upsert(pool: &PgPool, user: &UserUpsert) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, image_url)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                 email      = EXCLUDED.email,
                 image_url  = COALESCE(EXCLUDED.image_url, users.image_url),
                 updated_at = NOW()
             RETURNING id, email, image_url, created_at, updated_at",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.image_url)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    /// `None` when the account was never mirrored. A known user may still have no image.
    pub async fn avatar(pool: &PgPool, id: &str) -> anyhow::Result<Option<Avatar>> {
        let avatar = sqlx::query_as::<_, Avatar>("SELECT image_url FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(avatar)
    }

    pub async fn list(pool: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, image_url, created_at, updated_at
             FROM users
             ORDER BY created_at DESC, id",
        )
        .fetch_all(pool)
        .await?;
        Ok(users)
    }
}

use axum::http::StatusCode;

use crate::error::{error_response, ApiError};

/// Checks a per-key rate limit stored in Redis.
///
/// Uses the INCR + EXPIRE strategy:
/// - Increments a counter for `key`
/// - Sets the TTL to `window_secs` unless the key already has one
/// - Returns 429 if counter exceeds `max_attempts`
///
/// Both commands run in one MULTI/EXEC, so a counter never exists without a TTL.
/// Redis being unreachable lets the request through.
pub async fn check_rate_limit(
    redis: &redis::Client,
    key: &str,
    max_attempts: u64,
    window_secs: u64,
) -> Result<(), ApiError> {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!("rate limit skipped for {key}: redis unavailable: {e}");
            return Ok(());
        }
    };

    let result: redis::RedisResult<(u64, i64)> =
        window_pipeline(key, window_secs).query_async(&mut conn).await;
    let count = match result {
        Ok((count, _)) => count,
        Err(e) => {
            tracing::warn!("rate limit skipped for {key}: {e}");
            return Ok(());
        }
    };

    if count > max_attempts {
        return Err(error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many comments. Try again in a moment.",
        ));
    }

    Ok(())
}

/// INCR plus `EXPIRE .. NX` (Redis >= 7), so the window starts at the first hit.
fn window_pipeline(key: &str, window_secs: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("INCR")
        .arg(key)
        .cmd("EXPIRE")
        .arg(key)
        .arg(window_secs)
        .arg("NX");
    pipe
}

pub fn comment_key(user_id: &str) -> String {
    format!("comment:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(pipe: &redis::Pipeline) -> String {
        String::from_utf8_lossy(&pipe.get_packed_pipeline()).into_owned()
    }

    #[test]
    fn counter_and_ttl_are_set_in_one_transaction() {
        let wire = packed(&window_pipeline("comment:user_1", 60));
        let multi = wire.find("MULTI").unwrap();
        let incr = wire.find("INCR").unwrap();
        let expire = wire.find("EXPIRE").unwrap();
        let exec = wire.find("EXEC").unwrap();
        assert!(multi < incr && incr < expire && expire < exec);
        assert!(wire.contains("\r\nNX\r\n"));
        assert!(wire.contains("\r\n60\r\n"));
    }

    #[tokio::test]
    async fn unreachable_redis_lets_comments_through() {
        let client = redis::Client::open("redis://127.0.0.1:1").unwrap();
        assert!(check_rate_limit(&client, &comment_key("user_1"), 1, 60).await.is_ok());
    }

    #[test]
    fn keys_are_scoped_per_user() {
        assert_eq!(comment_key("user_42"), "comment:user_42");
    }
}

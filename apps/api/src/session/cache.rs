//! Redis-backed token → user cache.
//!
//! Keys are `session:<sha256(token)>`; raw tokens never reach Redis.
//! Failures are logged and treated as misses so the provider stays authoritative.

use std::future::Future;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ErrorKind, RedisError, RedisResult};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::session::AuthUser;

const KEY_PREFIX: &str = "session:";
/// Upper bound on any single cache round trip, connection setup included.
const OPERATION_TIMEOUT: Duration = Duration::from_millis(250);

/// One multiplexed connection shared by every request. `None` when Redis was
/// unreachable at startup; every operation is then a miss.
#[derive(Clone)]
pub struct SessionCache {
    conn: Option<ConnectionManager>,
    ttl_secs: u64,
}

impl SessionCache {
    pub async fn connect(redis: redis::Client, ttl_secs: u64) -> Self {
        match bounded(ConnectionManager::new(redis)).await {
            Ok(conn) => {
                info!("Session cache connected (ttl: {ttl_secs}s)");
                Self {
                    conn: Some(conn),
                    ttl_secs,
                }
            }
            Err(e) => {
                warn!("Session cache disabled, Redis unreachable: {e}");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            conn: None,
            ttl_secs: 0,
        }
    }

    pub async fn lookup(&self, access_token: &str) -> Option<AuthUser> {
        let mut conn = self.conn.clone()?;
        let key = cache_key(access_token);
        match bounded(conn.get::<_, Option<String>>(&key)).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable session cache entry: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Session cache read failed: {e}");
                None
            }
        }
    }

    pub async fn store(&self, access_token: &str, user: &AuthUser) {
        if self.ttl_secs == 0 {
            return;
        }
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize session cache entry: {e}");
                return;
            }
        };
        let key = cache_key(access_token);
        if let Err(e) = bounded(conn.set_ex::<_, _, ()>(&key, raw, self.ttl_secs)).await {
            warn!("Session cache write failed: {e}");
        }
    }

    pub async fn evict(&self, access_token: &str) {
        let Some(mut conn) = self.conn.clone() else {
            return;
        };
        let key = cache_key(access_token);
        if let Err(e) = bounded(conn.del::<_, ()>(&key)).await {
            warn!("Session cache eviction failed: {e}");
        }
    }
}

/// Turns a stalled Redis call into an ordinary error.
async fn bounded<T>(op: impl Future<Output = RedisResult<T>>) -> RedisResult<T> {
    match tokio::time::timeout(OPERATION_TIMEOUT, op).await {
        Ok(result) => result,
        Err(_) => Err(RedisError::from((
            ErrorKind::IoError,
            "session cache operation timed out",
        ))),
    }
}

fn cache_key(access_token: &str) -> String {
    let digest = Sha256::digest(access_token.as_bytes());
    format!("{KEY_PREFIX}{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_prefixed_hex_digest() {
        let key = cache_key("token");
        assert!(key.starts_with("session:"));
        assert_eq!(key.len(), "session:".len() + 64);
        assert!(!key.contains("token"));
    }

    #[test]
    fn test_cache_key_is_stable_per_token() {
        assert_eq!(cache_key("a.b.c"), cache_key("a.b.c"));
        assert_ne!(cache_key("a.b.c"), cache_key("a.b.d"));
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = SessionCache::disabled();
        let user = AuthUser {
            id: uuid::Uuid::new_v4(),
            email: None,
            full_name: None,
        };
        cache.store("token", &user).await;
        assert!(cache.lookup("token").await.is_none());
        cache.evict("token").await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_operation_times_out() {
        let result = bounded(std::future::pending::<RedisResult<()>>()).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_prompt_operation_passes_through() {
        let result = bounded(async { Ok::<_, RedisError>(Some("cached".to_string())) }).await;
        assert_eq!(result.unwrap().as_deref(), Some("cached"));
    }
}

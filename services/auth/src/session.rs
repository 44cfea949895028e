//! Admin sessions in Redis
//!
//! Each admin has at most one live refresh token. Logging in again replaces
//! it, so an older refresh token stops working even before it expires.

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use common::cache::RedisPool;
use market::session::session_key;

/// Session manager for handling admin sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl SessionManager {
    /// Create a new session manager; sessions live as long as refresh tokens
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }

    /// Store the current refresh token for an admin
    pub async fn store(&self, admin_id: Uuid, refresh_token: &str) -> Result<()> {
        info!("Storing session for admin: {}", admin_id);

        self.redis_pool
            .set(&session_key(admin_id), refresh_token, Some(self.ttl_seconds))
            .await
    }

    /// Whether `refresh_token` is the admin's current one
    pub async fn is_current(&self, admin_id: Uuid, refresh_token: &str) -> Result<bool> {
        let stored = self.redis_pool.get(&session_key(admin_id)).await?;
        Ok(stored.as_deref() == Some(refresh_token))
    }

    /// Drop the admin's session
    pub async fn delete(&self, admin_id: Uuid) -> Result<()> {
        info!("Deleting session for admin: {}", admin_id);
        self.redis_pool.delete(&session_key(admin_id)).await
    }
}

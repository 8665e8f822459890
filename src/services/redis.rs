//! Redis-backed session store

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use super::sessions::{SessionState, SessionStore};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

fn session_key(session_id: &str) -> String {
    format!("session:{}", session_id)
}

/// Expiry in whole seconds, within what SET EX accepts
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().clamp(1, i32::MAX as u64)
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl SessionStore for RedisService {
    async fn load(&self, session_id: &str) -> AppResult<Option<SessionState>> {
        let mut conn = self.connection().await?;

        let payload: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read session from Redis: {}", e)))?;

        match payload {
            Some(json) => match serde_json::from_str(&json) {
                Ok(state) => Ok(Some(state)),
                Err(e) => {
                    // Unreadable payloads start a fresh session
                    tracing::warn!("Discarding malformed session {}: {}", session_id, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, session_id: &str, state: &SessionState, ttl: Duration) -> AppResult<()> {
        let mut conn = self.connection().await?;

        let payload = serde_json::to_string(state)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {}", e)))?;

        conn.set_ex::<_, _, ()>(session_key(session_id), payload, expiry_seconds(ttl))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store session in Redis: {}", e)))?;

        Ok(())
    }
}

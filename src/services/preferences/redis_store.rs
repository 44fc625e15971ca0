use redis::{AsyncCommands, Client};
use uuid::Uuid;

use super::PreferenceStore;
use crate::{
    db::CacheKey,
    error::{AppError, AppResult},
    models::PreferenceProfile,
};

/// Preference profiles stored as one JSON document per user, without expiry
#[derive(Clone)]
pub struct RedisPreferenceStore {
    redis_client: Client,
}

impl RedisPreferenceStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for RedisPreferenceStore {
    async fn load(&self, user_id: Uuid) -> AppResult<Option<PreferenceProfile>> {
        let key = CacheKey::Profile(user_id);
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let stored: Option<String> = conn.get(key.to_string()).await.map_err(|e| {
            tracing::warn!(error = %e, user_id = %user_id, "Redis profile read failed");
            e
        })?;

        stored
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Profile deserialization error: {}", e))
                })
            })
            .transpose()
    }

    async fn save(&self, profile: &PreferenceProfile) -> AppResult<()> {
        let key = CacheKey::Profile(profile.user_id);
        let json = serde_json::to_string(profile)
            .map_err(|e| AppError::Internal(format!("Profile serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key.to_string(), json).await.map_err(|e| {
            tracing::warn!(error = %e, user_id = %profile.user_id, "Redis profile write failed");
            e
        })?;

        tracing::debug!(user_id = %profile.user_id, "Stored preference profile");
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        let key = CacheKey::Profile(user_id);
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let removed: i64 = conn.del(key.to_string()).await?;
        Ok(removed > 0)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

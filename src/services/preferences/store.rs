use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::AppResult, models::PreferenceProfile};

/// Durable per-user preference record storage
///
/// Each call is a single-document read, write or delete. Callers that
/// read-modify-write must serialize per user themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns an owned snapshot of the stored profile
    async fn load(&self, user_id: Uuid) -> AppResult<Option<PreferenceProfile>>;

    /// Replaces the whole stored profile
    async fn save(&self, profile: &PreferenceProfile) -> AppResult<()>;

    /// Deletes the profile; `false` when there was none
    async fn delete(&self, user_id: Uuid) -> AppResult<bool>;

    fn name(&self) -> &'static str;
}

#[derive(Default)]
pub struct InMemoryPreferenceStore {
    profiles: RwLock<HashMap<Uuid, PreferenceProfile>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn load(&self, user_id: Uuid) -> AppResult<Option<PreferenceProfile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save(&self, profile: &PreferenceProfile) -> AppResult<()> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self.profiles.write().await.remove(&user_id).is_some())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = InMemoryPreferenceStore::new();
        let user_id = Uuid::new_v4();

        assert!(store.load(user_id).await.unwrap().is_none());

        let profile = PreferenceProfile::new(user_id);
        store.save(&profile).await.unwrap();
        assert_eq!(store.load(user_id).await.unwrap(), Some(profile));

        assert!(store.delete(user_id).await.unwrap());
        assert!(!store.delete(user_id).await.unwrap());
        assert!(store.load(user_id).await.unwrap().is_none());
    }
}

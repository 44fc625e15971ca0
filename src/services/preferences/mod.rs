//! Preference mutation: view tracking, like, dislike, reset.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, PreferenceProfile},
    services::catalog::CatalogLookup,
};

pub mod locks;
pub mod redis_store;
pub mod store;

pub use locks::UserLocks;
pub use redis_store::RedisPreferenceStore;
pub use store::{InMemoryPreferenceStore, PreferenceStore};

/// Applies feedback events to user profiles
///
/// Every mutation validates the movie against the catalog first, then runs a
/// single load-modify-save cycle under the user's lock.
pub struct PreferenceUpdater {
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn PreferenceStore>,
    locks: UserLocks,
}

impl PreferenceUpdater {
    pub fn new(catalog: Arc<dyn CatalogLookup>, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            catalog,
            store,
            locks: UserLocks::new(),
        }
    }

    /// Records the first view of a movie; later views change nothing
    #[tracing::instrument(skip(self))]
    pub async fn track_view(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<PreferenceProfile> {
        let movie = self.require_movie(movie_id).await?;
        let viewed_at = Utc::now();
        self.mutate(user_id, |profile| profile.record_view(&movie, viewed_at))
            .await
    }

    /// Likes a movie, clearing any dislike of it
    #[tracing::instrument(skip(self))]
    pub async fn like(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<PreferenceProfile> {
        let movie = self.require_movie(movie_id).await?;
        self.mutate(user_id, |profile| profile.like(&movie)).await
    }

    /// Dislikes a movie, clearing any like of it
    #[tracing::instrument(skip(self))]
    pub async fn dislike(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<PreferenceProfile> {
        let movie = self.require_movie(movie_id).await?;
        self.mutate(user_id, |profile| profile.dislike(movie.id)).await
    }

    /// Deletes the whole profile. Succeeds when there is nothing to delete.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self, user_id: Uuid) -> AppResult<()> {
        let _guard = self.locks.acquire(user_id).await;
        let removed = self.store.delete(user_id).await?;
        tracing::info!(user_id = %user_id, removed, "Preference profile reset");
        Ok(())
    }

    /// The stored profile, or an empty one when the user has none
    pub async fn profile(&self, user_id: Uuid) -> AppResult<PreferenceProfile> {
        Ok(self
            .store
            .load(user_id)
            .await?
            .unwrap_or_else(|| PreferenceProfile::new(user_id)))
    }

    async fn require_movie(&self, movie_id: Uuid) -> AppResult<Movie> {
        self.catalog
            .find_by_id(movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
    }

    /// Load-or-create, apply, and save when anything changed
    async fn mutate<F>(&self, user_id: Uuid, apply: F) -> AppResult<PreferenceProfile>
    where
        F: FnOnce(&mut PreferenceProfile) -> bool,
    {
        let _guard = self.locks.acquire(user_id).await;

        let (mut profile, created) = match self.store.load(user_id).await? {
            Some(profile) => (profile, false),
            None => (PreferenceProfile::new(user_id), true),
        };

        let changed = apply(&mut profile);
        if changed || created {
            self.store.save(&profile).await?;
        }

        tracing::debug!(
            user_id = %user_id,
            created,
            changed,
            store = self.store.name(),
            "Preference profile updated"
        );

        Ok(profile)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Genre, Movie};

/// Genre weight added by the first view of a movie
pub const VIEW_WEIGHT: u32 = 1;
/// Genre weight added by a like; a like counts double a view
pub const LIKE_WEIGHT: u32 = 2;

/// Explicit feedback a user gave a movie.
///
/// A movie without an entry is neutral. Holding one entry per movie makes
/// "liked and disliked at once" unrepresentable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Liked,
    Disliked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReactionEntry {
    pub movie_id: Uuid,
    pub reaction: Reaction,
}

/// Affinity count for one genre
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreWeight {
    pub genre: Genre,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub movie_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}

/// Aggregate counts shown next to recommendations
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub total_viewed: usize,
    pub total_liked: usize,
    pub total_disliked: usize,
}

/// Per-user preference record, one document per user id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    pub user_id: Uuid,
    /// Genre weights in the order genres were first seen
    pub favorite_genres: Vec<GenreWeight>,
    /// Append-only; each movie appears at most once
    pub viewed_movies: Vec<ViewRecord>,
    reactions: Vec<ReactionEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PreferenceProfile {
    /// Creates an empty profile, also used as the "no profile yet" sentinel
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            favorite_genres: Vec::new(),
            viewed_movies: Vec::new(),
            reactions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when there is no genre signal to personalize on
    pub fn is_cold_start(&self) -> bool {
        self.favorite_genres.is_empty()
    }

    pub fn has_viewed(&self, movie_id: Uuid) -> bool {
        self.viewed_movies.iter().any(|v| v.movie_id == movie_id)
    }

    /// Records a view. Only the first view of a movie counts.
    ///
    /// Returns `false` when the movie was already in the history.
    pub fn record_view(&mut self, movie: &Movie, viewed_at: DateTime<Utc>) -> bool {
        if self.has_viewed(movie.id) {
            return false;
        }

        self.viewed_movies.push(ViewRecord {
            movie_id: movie.id,
            viewed_at,
        });
        self.bump_genre(movie.genre, VIEW_WEIGHT);
        self.touch();
        true
    }

    /// Marks a movie as liked, flipping a previous dislike.
    ///
    /// Returns `false` when the movie was already liked; the genre weight is
    /// only raised on the transition into `Liked`.
    pub fn like(&mut self, movie: &Movie) -> bool {
        if self.reaction(movie.id) == Some(Reaction::Liked) {
            return false;
        }

        self.set_reaction(movie.id, Reaction::Liked);
        self.bump_genre(movie.genre, LIKE_WEIGHT);
        self.touch();
        true
    }

    /// Marks a movie as disliked, flipping a previous like. Genre weights are untouched.
    pub fn dislike(&mut self, movie_id: Uuid) -> bool {
        if self.reaction(movie_id) == Some(Reaction::Disliked) {
            return false;
        }

        self.set_reaction(movie_id, Reaction::Disliked);
        self.touch();
        true
    }

    pub fn reaction(&self, movie_id: Uuid) -> Option<Reaction> {
        self.reactions
            .iter()
            .find(|entry| entry.movie_id == movie_id)
            .map(|entry| entry.reaction)
    }

    pub fn viewed_ids(&self) -> Vec<Uuid> {
        self.viewed_movies.iter().map(|v| v.movie_id).collect()
    }

    /// Liked movie ids in the order they were liked
    pub fn liked_ids(&self) -> Vec<Uuid> {
        self.ids_with(Reaction::Liked)
    }

    /// Disliked movie ids in the order they were disliked
    pub fn disliked_ids(&self) -> Vec<Uuid> {
        self.ids_with(Reaction::Disliked)
    }

    #[cfg(test)]
    pub fn genre_weight(&self, genre: Genre) -> u32 {
        self.favorite_genres
            .iter()
            .find(|g| g.genre == genre)
            .map_or(0, |g| g.count)
    }

    /// Genres by weight descending, equal weights by genre label ascending
    pub fn ranked_genres(&self) -> Vec<GenreWeight> {
        let mut ranked = self.favorite_genres.clone();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.genre.as_str().cmp(b.genre.as_str()))
        });
        ranked
    }

    pub fn top_genres(&self, n: usize) -> Vec<GenreWeight> {
        let mut ranked = self.ranked_genres();
        ranked.truncate(n);
        ranked
    }

    pub fn stats(&self) -> ProfileStats {
        ProfileStats {
            total_viewed: self.viewed_movies.len(),
            total_liked: self.count_with(Reaction::Liked),
            total_disliked: self.count_with(Reaction::Disliked),
        }
    }

    fn bump_genre(&mut self, genre: Genre, by: u32) {
        match self.favorite_genres.iter_mut().find(|g| g.genre == genre) {
            Some(weight) => weight.count += by,
            None => self.favorite_genres.push(GenreWeight { genre, count: by }),
        }
    }

    // Re-appends so a flipped movie sorts as the most recent reaction.
    fn set_reaction(&mut self, movie_id: Uuid, reaction: Reaction) {
        self.reactions.retain(|entry| entry.movie_id != movie_id);
        self.reactions.push(ReactionEntry { movie_id, reaction });
    }

    fn ids_with(&self, reaction: Reaction) -> Vec<Uuid> {
        self.reactions
            .iter()
            .filter(|entry| entry.reaction == reaction)
            .map(|entry| entry.movie_id)
            .collect()
    }

    fn count_with(&self, reaction: Reaction) -> usize {
        self.reactions
            .iter()
            .filter(|entry| entry.reaction == reaction)
            .count()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

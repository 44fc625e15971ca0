use std::collections::HashMap;

use uuid::Uuid;

use super::exclusion::ExclusionSet;
use super::scoring::{score, Provenance};
use super::MAX_RECOMMENDATIONS;
use crate::{
    error::AppResult,
    models::{Genre, GenreWeight, Movie, PreferenceProfile, Recommendation},
    services::catalog::CatalogLookup,
};

const FAVORITE_GENRE_COUNT: usize = 3;
const FAVORITE_GENRE_LIMIT: usize = 4;
const FAVORITE_GENRE_MIN_RATING: f64 = 7.5;

const SIMILAR_TO_LIKED_LIMIT: usize = 2;

const EXPLORE_MIN_FAVORITE_GENRES: usize = 2;
/// Exploration only runs while fewer candidates than this have been collected
const EXPLORE_CANDIDATE_CEILING: usize = 10;
const EXPLORE_LIMIT: usize = 2;
const EXPLORE_MIN_RATING: f64 = 8.0;

const FILL_MIN_RATING: f64 = 7.0;

/// Runs the four candidate tiers in priority order against the catalog.
///
/// Viewed and disliked movies seed the exclusion set; every movie a tier
/// returns is added to it before the next tier queries, so no movie is
/// produced twice.
pub struct CandidateGenerator<'a> {
    catalog: &'a dyn CatalogLookup,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(catalog: &'a dyn CatalogLookup) -> Self {
        Self { catalog }
    }

    /// Produces scored candidates for a profile with genre signal
    pub async fn generate(&self, profile: &PreferenceProfile) -> AppResult<Vec<Recommendation>> {
        let mut excluded: ExclusionSet = profile
            .viewed_ids()
            .into_iter()
            .chain(profile.disliked_ids())
            .collect();
        let mut candidates = Vec::new();
        let ranked_genres = profile.ranked_genres();

        self.favorite_genres(&ranked_genres, &mut excluded, &mut candidates)
            .await?;
        self.similar_to_liked(&profile.liked_ids(), &mut excluded, &mut candidates)
            .await?;
        self.explore(&ranked_genres, &mut excluded, &mut candidates)
            .await?;
        self.fill(&mut excluded, &mut candidates).await?;

        Ok(candidates)
    }

    async fn favorite_genres(
        &self,
        ranked_genres: &[GenreWeight],
        excluded: &mut ExclusionSet,
        candidates: &mut Vec<Recommendation>,
    ) -> AppResult<()> {
        for favorite in ranked_genres.iter().take(FAVORITE_GENRE_COUNT) {
            let batch = self
                .catalog
                .find_by_genre(
                    favorite.genre,
                    Some(FAVORITE_GENRE_MIN_RATING),
                    excluded.as_slice(),
                    FAVORITE_GENRE_LIMIT,
                )
                .await?;

            tracing::debug!(genre = %favorite.genre, found = batch.len(), "Favorite-genre tier");
            accept(
                batch,
                Provenance::FavoriteGenre {
                    genre: favorite.genre,
                    weight: favorite.count,
                },
                excluded,
                candidates,
            );
        }
        Ok(())
    }

    async fn similar_to_liked(
        &self,
        liked_ids: &[Uuid],
        excluded: &mut ExclusionSet,
        candidates: &mut Vec<Recommendation>,
    ) -> AppResult<()> {
        if liked_ids.is_empty() {
            return Ok(());
        }

        let liked_movies = self.catalog.find_by_ids(liked_ids).await?;
        let genres = liked_genres(liked_ids, &liked_movies);

        // Liked movies are only off-limits for this tier.
        let mut tier_excluded = excluded.clone();
        tier_excluded.extend(liked_ids.iter().copied());

        for genre in genres {
            let batch = self
                .catalog
                .find_by_genre(genre, None, tier_excluded.as_slice(), SIMILAR_TO_LIKED_LIMIT)
                .await?;

            tracing::debug!(genre = %genre, found = batch.len(), "Similar-to-liked tier");
            tier_excluded.extend(batch.iter().map(|m| m.id));
            accept(batch, Provenance::SimilarToLiked, excluded, candidates);
        }
        Ok(())
    }

    async fn explore(
        &self,
        ranked_genres: &[GenreWeight],
        excluded: &mut ExclusionSet,
        candidates: &mut Vec<Recommendation>,
    ) -> AppResult<()> {
        if ranked_genres.len() < EXPLORE_MIN_FAVORITE_GENRES
            || candidates.len() >= EXPLORE_CANDIDATE_CEILING
        {
            return Ok(());
        }

        let unexplored: Vec<Genre> = Genre::ALL
            .into_iter()
            .filter(|genre| !ranked_genres.iter().any(|g| g.genre == *genre))
            .collect();
        if unexplored.is_empty() {
            return Ok(());
        }

        let batch = self
            .catalog
            .find_by_genres(
                Some(unexplored),
                Some(EXPLORE_MIN_RATING),
                excluded.as_slice(),
                EXPLORE_LIMIT,
            )
            .await?;

        tracing::debug!(found = batch.len(), "Exploration tier");
        accept(batch, Provenance::Explore, excluded, candidates);
        Ok(())
    }

    async fn fill(
        &self,
        excluded: &mut ExclusionSet,
        candidates: &mut Vec<Recommendation>,
    ) -> AppResult<()> {
        let missing = MAX_RECOMMENDATIONS.saturating_sub(candidates.len());
        if missing == 0 {
            return Ok(());
        }

        let batch = self
            .catalog
            .find_by_genres(None, Some(FILL_MIN_RATING), excluded.as_slice(), missing)
            .await?;

        tracing::debug!(requested = missing, found = batch.len(), "Fill tier");
        accept(batch, Provenance::Fill, excluded, candidates);
        Ok(())
    }
}

fn accept(
    batch: Vec<Movie>,
    provenance: Provenance,
    excluded: &mut ExclusionSet,
    candidates: &mut Vec<Recommendation>,
) {
    for movie in batch {
        excluded.insert(movie.id);
        candidates.push(score(movie, provenance));
    }
}

/// Distinct genres of the liked movies, in the order the movies were liked
fn liked_genres(liked_ids: &[Uuid], liked_movies: &[Movie]) -> Vec<Genre> {
    let by_id: HashMap<Uuid, Genre> = liked_movies.iter().map(|m| (m.id, m.genre)).collect();
    let mut genres = Vec::new();
    for genre in liked_ids.iter().filter_map(|id| by_id.get(id)) {
        if !genres.contains(genre) {
            genres.push(*genre);
        }
    }
    genres
}

//! Recommendation retrieval and scoring.
//!
//! A request reads one snapshot of the user's profile. Users without genre
//! signal get the cold-start list; everyone else goes through the tiered
//! [`CandidateGenerator`], then [`ranking::rank`].

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{GenreShare, GenreWeight, PreferenceProfile, RecommendationSet},
    services::{catalog::CatalogLookup, preferences::PreferenceStore},
};

pub mod candidates;
pub mod exclusion;
pub mod ranking;
pub mod scoring;

pub use candidates::CandidateGenerator;
pub use exclusion::ExclusionSet;

/// Upper bound on the length of any recommendation list
pub const MAX_RECOMMENDATIONS: usize = 12;

const TOP_GENRES_SHOWN: usize = 3;
const GENRE_DISTRIBUTION_SIZE: usize = 5;

pub const COLD_START_REASON: &str =
    "Top rated movies - Start watching to get personalized recommendations!";

pub struct Recommender {
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn PreferenceStore>,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn CatalogLookup>, store: Arc<dyn PreferenceStore>) -> Self {
        Self { catalog, store }
    }

    /// Builds the ranked recommendation list for a user
    #[tracing::instrument(skip(self))]
    pub async fn recommend(&self, user_id: Uuid) -> AppResult<RecommendationSet> {
        let snapshot = self.store.load(user_id).await?;

        let set = match snapshot {
            Some(profile) if !profile.is_cold_start() => self.personalized(&profile).await?,
            other => self.cold_start(other.as_ref()).await?,
        };

        tracing::info!(
            user_id = %user_id,
            personalized = set.personalized,
            count = set.items.len(),
            catalog = self.catalog.name(),
            "Recommendations computed"
        );

        Ok(set)
    }

    async fn cold_start(&self, profile: Option<&PreferenceProfile>) -> AppResult<RecommendationSet> {
        // A profile can exist without genre signal when it only holds dislikes.
        let disliked = profile.map(|p| p.disliked_ids()).unwrap_or_default();
        let movies = self
            .catalog
            .find_top_rated(&disliked, MAX_RECOMMENDATIONS)
            .await?;

        Ok(RecommendationSet {
            items: ranking::rank(
                scoring::score_batch(movies, scoring::Provenance::TopRated),
                MAX_RECOMMENDATIONS,
            ),
            personalized: false,
            reason: COLD_START_REASON.to_string(),
            top_genres: Vec::new(),
            stats: profile.map(|p| p.stats()).unwrap_or_default(),
            genre_distribution: Vec::new(),
        })
    }

    async fn personalized(&self, profile: &PreferenceProfile) -> AppResult<RecommendationSet> {
        let candidates = CandidateGenerator::new(self.catalog.as_ref())
            .generate(profile)
            .await?;
        let candidate_count = candidates.len();
        let items = ranking::rank(candidates, MAX_RECOMMENDATIONS);

        tracing::debug!(
            candidates = candidate_count,
            kept = items.len(),
            "Ranked candidates"
        );

        let top_genres = profile.top_genres(TOP_GENRES_SHOWN);
        Ok(RecommendationSet {
            items,
            personalized: true,
            reason: describe(profile.stats().total_liked, &top_genres),
            top_genres,
            stats: profile.stats(),
            genre_distribution: genre_distribution(profile),
        })
    }
}

fn describe(liked_count: usize, top_genres: &[GenreWeight]) -> String {
    let genres = top_genres
        .iter()
        .map(|g| g.genre.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if liked_count > 0 {
        format!(
            "Based on {} movies you liked and your love for {}",
            liked_count, genres
        )
    } else {
        format!("Based on your viewing history in {}", genres)
    }
}

fn genre_distribution(profile: &PreferenceProfile) -> Vec<GenreShare> {
    let ranked = profile.ranked_genres();
    let total: u32 = ranked.iter().map(|g| g.count).sum();
    if total == 0 {
        return Vec::new();
    }

    ranked
        .into_iter()
        .take(GENRE_DISTRIBUTION_SIZE)
        .map(|g| GenreShare {
            genre: g.genre,
            weight: f64::from(g.count) / f64::from(total),
            count: g.count,
        })
        .collect()
}

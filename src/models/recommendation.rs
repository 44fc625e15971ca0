use serde::Serialize;

use super::{Genre, GenreWeight, Movie, ProfileStats};

/// Candidate-generation strategy that produced a recommendation, in priority order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    FavoriteGenre,
    SimilarToLiked,
    Explore,
    Fill,
    /// Non-personalized fallback for users without genre signal
    TopRated,
}

/// A scored candidate with its human-readable justification
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub score: f64,
    pub reason: String,
    pub tier: Tier,
}

/// A genre's share of the user's total affinity
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreShare {
    pub genre: Genre,
    pub weight: f64,
    pub count: u32,
}

/// Final ranked output for one request. Never persisted.
#[derive(Debug, Clone)]
pub struct RecommendationSet {
    pub items: Vec<Recommendation>,
    pub personalized: bool,
    pub reason: String,
    pub top_genres: Vec<GenreWeight>,
    pub stats: ProfileStats,
    /// Empty for cold-start results
    pub genre_distribution: Vec<GenreShare>,
}

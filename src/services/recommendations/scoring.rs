use crate::models::{Genre, Movie, Recommendation, Tier};

/// Each point of genre weight adds 10% to a favorite-genre score
pub const GENRE_WEIGHT_FACTOR: f64 = 0.1;
/// Multiplier for movies sharing a genre with something the user liked
pub const SIMILAR_TO_LIKED_BOOST: f64 = 1.2;

/// What the scorer needs to know about where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Provenance {
    FavoriteGenre { genre: Genre, weight: u32 },
    SimilarToLiked,
    Explore,
    Fill,
    TopRated,
}

impl Provenance {
    pub fn tier(&self) -> Tier {
        match self {
            Provenance::FavoriteGenre { .. } => Tier::FavoriteGenre,
            Provenance::SimilarToLiked => Tier::SimilarToLiked,
            Provenance::Explore => Tier::Explore,
            Provenance::Fill => Tier::Fill,
            Provenance::TopRated => Tier::TopRated,
        }
    }
}

/// Attaches a score and reason to a candidate
pub fn score(movie: Movie, provenance: Provenance) -> Recommendation {
    let (score, reason) = match provenance {
        Provenance::FavoriteGenre { genre, weight } => (
            movie.rating * (1.0 + f64::from(weight) * GENRE_WEIGHT_FACTOR),
            format!("genre affinity: {}", genre),
        ),
        Provenance::SimilarToLiked => (
            movie.rating * SIMILAR_TO_LIKED_BOOST,
            "similar to liked".to_string(),
        ),
        Provenance::Explore => (movie.rating, format!("explore: {}", movie.genre)),
        Provenance::Fill => (movie.rating, "popular pick".to_string()),
        Provenance::TopRated => (movie.rating, "top rated".to_string()),
    };

    Recommendation {
        movie,
        score,
        reason,
        tier: provenance.tier(),
    }
}

/// Scores a whole tier batch with one provenance
pub fn score_batch(movies: Vec<Movie>, provenance: Provenance) -> Vec<Recommendation> {
    movies.into_iter().map(|m| score(m, provenance)).collect()
}

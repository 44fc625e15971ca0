use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

pub mod movie;
pub mod preference;
pub mod recommendation;

pub use movie::{Movie, MovieFilter};
pub use preference::{GenreWeight, PreferenceProfile, ProfileStats, Reaction, ReactionEntry, ViewRecord};
pub use recommendation::{GenreShare, Recommendation, RecommendationSet, Tier};

/// Genre of a catalog movie
///
/// The catalog only accepts this fixed set; exploration walks it to find
/// genres a user has never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
    Documentary,
    Animation,
    Fantasy,
}

impl Genre {
    pub const ALL: [Genre; 10] = [
        Genre::Action,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::Documentary,
        Genre::Animation,
        Genre::Fantasy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::Documentary => "Documentary",
            Genre::Animation => "Animation",
            Genre::Fantasy => "Fantasy",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .iter()
            .find(|genre| genre.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown genre: {}", s))
    }
}

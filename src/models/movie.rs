use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Genre;

/// A catalog movie. Read-only to the recommendation core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub director: String,
    pub genre: Genre,
    pub release_year: i32,
    /// 0.0 to 10.0
    pub rating: f64,
    pub description: String,
    #[serde(default)]
    pub cast: Vec<String>,
    /// Running time in minutes
    pub duration: i32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_language() -> String {
    "English".to_string()
}

fn default_available() -> bool {
    true
}

impl Movie {
    /// Creates an available movie with placeholder metadata
    pub fn new(title: impl Into<String>, genre: Genre, rating: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            director: "Unknown".to_string(),
            genre,
            release_year: 2000,
            rating,
            description: String::new(),
            cast: Vec::new(),
            duration: 120,
            language: default_language(),
            poster_url: None,
            available: true,
        }
    }

    /// Case-insensitive match against title or director
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.director.to_lowercase().contains(&query)
    }
}

/// Browse filter for the catalog listing endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    pub search: Option<String>,
    pub genre: Option<Genre>,
}

impl MovieFilter {
    pub fn matches(&self, movie: &Movie) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map_or(true, |q| movie.matches_search(q));
        let genre_ok = self.genre.map_or(true, |genre| movie.genre == genre);
        search_ok && genre_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_seed_entry_with_defaults() {
        let json = r#"{
            "id": "6d6f7669-6500-4000-8000-000000000001",
            "title": "The Shawshank Redemption",
            "director": "Frank Darabont",
            "genre": "Drama",
            "releaseYear": 1994,
            "rating": 9.3,
            "description": "Two imprisoned men bond over a number of years.",
            "duration": 142
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.genre, Genre::Drama);
        assert_eq!(movie.release_year, 1994);
        assert_eq!(movie.language, "English");
        assert!(movie.available);
        assert!(movie.cast.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let movie = Movie::new("Alien", Genre::SciFi, 8.5);
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["releaseYear"], 2000);
        assert_eq!(value["genre"], "Sci-Fi");
        assert!(value.get("posterUrl").is_some());
    }

    #[test]
    fn test_filter_by_search_and_genre() {
        let mut movie = Movie::new("The Dark Knight", Genre::Action, 9.0);
        movie.director = "Christopher Nolan".to_string();

        let by_director = MovieFilter {
            search: Some("nolan".to_string()),
            genre: None,
        };
        assert!(by_director.matches(&movie));

        let wrong_genre = MovieFilter {
            search: Some("dark".to_string()),
            genre: Some(Genre::Comedy),
        };
        assert!(!wrong_genre.matches(&movie));

        let blank = MovieFilter {
            search: Some("   ".to_string()),
            genre: None,
        };
        assert!(blank.matches(&movie));
    }
}

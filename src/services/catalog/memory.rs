use std::collections::{HashMap, HashSet};
use std::path::Path;

use uuid::Uuid;

use super::CatalogLookup;
use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieFilter},
};

/// Immutable catalog held in memory, loaded once from a JSON seed file
pub struct InMemoryCatalog {
    movies: Vec<Movie>,
    index: HashMap<Uuid, usize>,
}

impl InMemoryCatalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        let index = movies
            .iter()
            .enumerate()
            .map(|(pos, movie)| (movie.id, pos))
            .collect();
        Self { movies, index }
    }

    /// Loads a JSON array of movies
    pub async fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let movies = read_seed_file(path.as_ref()).await?;
        tracing::info!(movie_count = movies.len(), "Loaded in-memory catalog");
        Ok(Self::new(movies))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    fn ranked<F>(&self, exclude: &[Uuid], limit: usize, keep: F) -> Vec<Movie>
    where
        F: Fn(&Movie) -> bool,
    {
        let excluded: HashSet<&Uuid> = exclude.iter().collect();
        let mut matches: Vec<&Movie> = self
            .movies
            .iter()
            .filter(|m| m.available && !excluded.contains(&m.id) && keep(m))
            .collect();
        matches.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        matches.into_iter().take(limit).cloned().collect()
    }
}

/// Parses the JSON seed catalog; array order is insertion order
pub async fn read_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<Movie>> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read catalog seed {}: {}", path.display(), e))?;
    let movies: Vec<Movie> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid catalog seed {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), movie_count = movies.len(), "Read catalog seed");
    Ok(movies)
}

fn meets(rating: f64, min_rating: Option<f64>) -> bool {
    min_rating.map_or(true, |min| rating >= min)
}

#[async_trait::async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(self.index.get(&id).map(|&pos| self.movies[pos].clone()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Movie>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.index.get(id))
            .map(|&pos| self.movies[pos].clone())
            .collect())
    }

    async fn find_by_genre(
        &self,
        genre: Genre,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        Ok(self.ranked(exclude, limit, |m| {
            m.genre == genre && meets(m.rating, min_rating)
        }))
    }

    async fn find_by_genres(
        &self,
        genres: Option<Vec<Genre>>,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        Ok(self.ranked(exclude, limit, |m| {
            let genre_ok = genres.as_ref().map_or(true, |gs| gs.contains(&m.genre));
            genre_ok && meets(m.rating, min_rating)
        }))
    }

    async fn find_top_rated(&self, exclude: &[Uuid], limit: usize) -> AppResult<Vec<Movie>> {
        Ok(self.ranked(exclude, limit, |_| true))
    }

    async fn list(&self, filter: &MovieFilter) -> AppResult<Vec<Movie>> {
        // Seed order is insertion order
        Ok(self
            .movies
            .iter()
            .rev()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> (InMemoryCatalog, Vec<Movie>) {
        let mut hidden = Movie::new("Withdrawn", Genre::Drama, 9.9);
        hidden.available = false;
        let movies = vec![
            Movie::new("Drama A", Genre::Drama, 8.1),
            Movie::new("Drama B", Genre::Drama, 9.1),
            Movie::new("Comedy A", Genre::Comedy, 7.2),
            Movie::new("Horror A", Genre::Horror, 6.5),
            hidden,
        ];
        (InMemoryCatalog::new(movies.clone()), movies)
    }

    #[test]
    fn test_find_by_id_includes_unavailable() {
        let (catalog, movies) = catalog();
        let found = tokio_test::block_on(catalog.find_by_id(movies[4].id)).unwrap();
        assert_eq!(found.map(|m| m.title), Some("Withdrawn".to_string()));

        let missing = tokio_test::block_on(catalog.find_by_id(Uuid::new_v4())).unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_by_genre_orders_and_filters() {
        let (catalog, movies) = catalog();

        let dramas = catalog
            .find_by_genre(Genre::Drama, Some(7.5), &[], 4)
            .await
            .unwrap();
        let titles: Vec<&str> = dramas.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Drama B", "Drama A"]);

        let excluded = catalog
            .find_by_genre(Genre::Drama, None, &[movies[1].id], 4)
            .await
            .unwrap();
        assert_eq!(excluded.len(), 1);
        assert_eq!(excluded[0].id, movies[0].id);
    }

    #[tokio::test]
    async fn test_find_by_genres_any_genre_with_threshold() {
        let (catalog, _) = catalog();
        let picks = catalog.find_by_genres(None, Some(7.0), &[], 10).await.unwrap();
        assert_eq!(picks.len(), 3);
        assert!(picks.windows(2).all(|w| w[0].rating >= w[1].rating));

        let comedies = catalog
            .find_by_genres(Some(vec![Genre::Comedy, Genre::Horror]), None, &[], 1)
            .await
            .unwrap();
        assert_eq!(comedies[0].title, "Comedy A");
    }

    #[tokio::test]
    async fn test_top_rated_skips_unavailable() {
        let (catalog, _) = catalog();
        let top = catalog.find_top_rated(&[], 2).await.unwrap();
        let titles: Vec<&str> = top.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Drama B", "Drama A"]);
    }

    #[tokio::test]
    async fn test_seed_file_loads() {
        let catalog = InMemoryCatalog::from_seed_file("data/movies.json")
            .await
            .unwrap();
        assert!(catalog.len() >= 20);

        let filter = MovieFilter {
            search: Some("nolan".to_string()),
            genre: Some(Genre::Action),
        };
        let nolan = catalog.list(&filter).await.unwrap();
        assert!(nolan.iter().any(|m| m.title == "The Dark Knight"));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (catalog, _) = catalog();
        let all = catalog.list(&MovieFilter::default()).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Withdrawn", "Horror A", "Comedy A", "Drama B", "Drama A"]
        );

        let dramas = catalog
            .list(&MovieFilter {
                search: None,
                genre: Some(Genre::Drama),
            })
            .await
            .unwrap();
        assert_eq!(dramas[0].title, "Withdrawn");
        assert_eq!(dramas.len(), 3);
    }
}

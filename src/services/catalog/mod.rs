//! Catalog lookup abstraction
//!
//! The recommendation core only reads the movie catalog, through the query
//! shapes below. Every ranked query returns available movies only, ordered by
//! rating descending, and never returns an id listed in `exclude`.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Genre, Movie, MovieFilter},
};

pub mod memory;
pub mod postgres;

pub use memory::{read_seed_file, InMemoryCatalog};
pub use postgres::PgCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Fetch one movie regardless of availability; `None` means unknown id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>>;

    /// Fetch every known movie among `ids`, in no particular order
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Movie>>;

    /// Best-rated movies of one genre
    async fn find_by_genre(
        &self,
        genre: Genre,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>>;

    /// Best-rated movies across a set of genres; `None` means any genre
    async fn find_by_genres(
        &self,
        genres: Option<Vec<Genre>>,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>>;

    /// Best-rated movies of the whole catalog
    async fn find_top_rated(&self, exclude: &[Uuid], limit: usize) -> AppResult<Vec<Movie>>;

    /// Browse listing, newest-added first, availability ignored
    async fn list(&self, filter: &MovieFilter) -> AppResult<Vec<Movie>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

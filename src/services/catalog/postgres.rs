use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::CatalogLookup;
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Genre, Movie, MovieFilter},
};

/// Rows per INSERT, well under the Postgres bind-parameter limit
const SEED_BATCH: usize = 500;

const MOVIE_COLUMNS: &str = r#"id, title, director, genre, release_year, rating, description,
    "cast", duration, language, poster_url, available"#;

/// Row shape of the `movies` table
#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    director: String,
    genre: String,
    release_year: i32,
    rating: f64,
    description: String,
    cast: Vec<String>,
    duration: i32,
    language: String,
    poster_url: Option<String>,
    available: bool,
}

impl TryFrom<MovieRow> for Movie {
    type Error = AppError;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        let genre = row
            .genre
            .parse::<Genre>()
            .map_err(|e| AppError::Internal(format!("Corrupt movie row {}: {}", row.id, e)))?;

        Ok(Movie {
            id: row.id,
            title: row.title,
            director: row.director,
            genre,
            release_year: row.release_year,
            rating: row.rating,
            description: row.description,
            cast: row.cast,
            duration: row.duration,
            language: row.language,
            poster_url: row.poster_url,
            available: row.available,
        })
    }
}

fn into_movies(rows: Vec<MovieRow>) -> AppResult<Vec<Movie>> {
    rows.into_iter().map(Movie::try_from).collect()
}

/// PostgreSQL-backed catalog
///
/// When a Redis cache is attached, the unfiltered top-rated list (the
/// cold-start answer for brand-new users) is served from it.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
    cache: Option<Cache>,
    top_rated_ttl: u64,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: None,
            top_rated_ttl: 0,
        }
    }

    pub fn with_cache(mut self, cache: Cache, top_rated_ttl: u64) -> Self {
        self.cache = Some(cache);
        self.top_rated_ttl = top_rated_ttl;
        self
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts `movies` in one transaction, skipping ids already present.
    ///
    /// `created_at` follows slice order so browse listings and rating ties
    /// come out the same as the in-memory catalog.
    pub async fn seed(&self, movies: &[Movie]) -> AppResult<u64> {
        let base = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for (batch_index, batch) in movies.chunks(SEED_BATCH).enumerate() {
            let offset = batch_index * SEED_BATCH;
            let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
                r#"INSERT INTO movies (id, title, director, genre, release_year, rating,
                description, "cast", duration, language, poster_url, available, created_at) "#,
            );
            query.push_values(batch.iter().enumerate(), |mut row, (i, movie)| {
                row.push_bind(movie.id)
                    .push_bind(movie.title.clone())
                    .push_bind(movie.director.clone())
                    .push_bind(movie.genre.as_str())
                    .push_bind(movie.release_year)
                    .push_bind(movie.rating)
                    .push_bind(movie.description.clone())
                    .push_bind(movie.cast.clone())
                    .push_bind(movie.duration)
                    .push_bind(movie.language.clone())
                    .push_bind(movie.poster_url.clone())
                    .push_bind(movie.available)
                    .push_bind(base + Duration::milliseconds((offset + i) as i64));
            });
            query.push(" ON CONFLICT (id) DO NOTHING");

            inserted += query.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        tracing::info!(inserted, offered = movies.len(), "Seeded movie catalog");
        Ok(inserted)
    }

    /// Shared ranked query: available, not excluded, rating descending
    async fn ranked(
        &self,
        genres: Option<&[Genre]>,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        query.push(MOVIE_COLUMNS);
        query.push(" FROM movies WHERE available");

        if let Some(genres) = genres {
            let labels: Vec<String> = genres.iter().map(|g| g.as_str().to_string()).collect();
            query.push(" AND genre = ANY(").push_bind(labels).push(")");
        }
        if let Some(min_rating) = min_rating {
            query.push(" AND rating >= ").push_bind(min_rating);
        }
        if !exclude.is_empty() {
            query.push(" AND NOT (id = ANY(").push_bind(exclude.to_vec()).push("))");
        }
        query
            .push(" ORDER BY rating DESC, created_at ASC LIMIT ")
            .push_bind(limit as i64);

        let rows: Vec<MovieRow> = query.build_query_as().fetch_all(&self.pool).await?;
        into_movies(rows)
    }
}

#[async_trait::async_trait]
impl CatalogLookup for PgCatalog {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let sql = format!("SELECT {} FROM movies WHERE id = $1", MOVIE_COLUMNS);
        let row: Option<MovieRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Movie::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Movie>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM movies WHERE id = ANY($1)", MOVIE_COLUMNS);
        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        into_movies(rows)
    }

    async fn find_by_genre(
        &self,
        genre: Genre,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        self.ranked(Some(std::slice::from_ref(&genre)), min_rating, exclude, limit)
            .await
    }

    async fn find_by_genres(
        &self,
        genres: Option<Vec<Genre>>,
        min_rating: Option<f64>,
        exclude: &[Uuid],
        limit: usize,
    ) -> AppResult<Vec<Movie>> {
        self.ranked(genres.as_deref(), min_rating, exclude, limit).await
    }

    async fn find_top_rated(&self, exclude: &[Uuid], limit: usize) -> AppResult<Vec<Movie>> {
        match &self.cache {
            Some(cache) if exclude.is_empty() => {
                cached!(
                    cache,
                    CacheKey::TopRated(limit),
                    self.top_rated_ttl,
                    self.ranked(None, None, &[], limit)
                )
            }
            _ => self.ranked(None, None, exclude, limit).await,
        }
    }

    async fn list(&self, filter: &MovieFilter) -> AppResult<Vec<Movie>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        query.push(MOVIE_COLUMNS);
        query.push(" FROM movies WHERE TRUE");

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR director ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(genre) = filter.genre {
            query.push(" AND genre = ").push_bind(genre.as_str());
        }
        query.push(" ORDER BY created_at DESC");

        let rows: Vec<MovieRow> = query.build_query_as().fetch_all(&self.pool).await?;
        into_movies(rows)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

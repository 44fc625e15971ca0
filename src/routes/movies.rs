use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{Genre, Movie, MovieFilter},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct MovieQuery {
    search: Option<String>,
    genre: Option<String>,
}

impl TryFrom<MovieQuery> for MovieFilter {
    type Error = AppError;

    fn try_from(query: MovieQuery) -> Result<Self, Self::Error> {
        // "All" is what the browse screen sends for no genre filter
        let genre = match query.genre.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(g) if g.eq_ignore_ascii_case("all") => None,
            Some(g) => Some(g.parse::<Genre>().map_err(AppError::InvalidInput)?),
        };
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(MovieFilter { search, genre })
    }
}

/// Lists catalog movies matching the optional search and genre filters
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<MovieQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let filter = MovieFilter::try_from(params)?;
    let movies = state
        .catalog
        .list(&filter)
        .await
        .map_err(|e| e.during("Error fetching movies"))?;
    Ok(Json(movies))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Movie>> {
    state
        .catalog
        .find_by_id(id)
        .await
        .map_err(|e| e.during("Error fetching movie"))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: Option<&str>, genre: Option<&str>) -> MovieQuery {
        MovieQuery {
            search: search.map(str::to_string),
            genre: genre.map(str::to_string),
        }
    }

    #[test]
    fn test_all_and_blank_mean_no_genre() {
        for genre in [None, Some(""), Some("All"), Some("all")] {
            let filter = MovieFilter::try_from(query(None, genre)).unwrap();
            assert_eq!(filter.genre, None);
        }
    }

    #[test]
    fn test_genre_is_parsed() {
        let filter = MovieFilter::try_from(query(Some("  matrix "), Some("Sci-Fi"))).unwrap();
        assert_eq!(filter.genre, Some(Genre::SciFi));
        assert_eq!(filter.search.as_deref(), Some("matrix"));
    }

    #[test]
    fn test_unknown_genre_is_rejected() {
        let err = MovieFilter::try_from(query(None, Some("Western"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::{CurrentUser, RequestId},
    models::{
        GenreShare, GenreWeight, Movie, PreferenceProfile, ProfileStats, RecommendationSet, Tier,
        ViewRecord,
    },
    state::AppState,
};

// Request/Response types

/// Body of the feedback endpoints; `movieId` is accepted for older clients
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[serde(default, alias = "movieId")]
    pub item_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: String,
    pub preferences: PreferencesView,
}

/// Client view of a profile; an absent profile renders as all-empty
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesView {
    /// Sorted by count descending
    pub favorite_genres: Vec<GenreWeight>,
    pub viewed_count: usize,
    pub liked_count: usize,
    pub disliked_count: usize,
    pub viewed_movies: Vec<ViewRecord>,
    pub liked_movies: Vec<Uuid>,
    pub disliked_movies: Vec<Uuid>,
}

impl From<&PreferenceProfile> for PreferencesView {
    fn from(profile: &PreferenceProfile) -> Self {
        let stats = profile.stats();
        Self {
            favorite_genres: profile.ranked_genres(),
            viewed_count: stats.total_viewed,
            liked_count: stats.total_liked,
            disliked_count: stats.total_disliked,
            viewed_movies: profile.viewed_movies.clone(),
            liked_movies: profile.liked_ids(),
            disliked_movies: profile.disliked_ids(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub recommendation_reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDetail {
    pub item_id: Uuid,
    pub reason: String,
    /// Rounded to two decimals
    pub score: f64,
    pub tier: Tier,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    #[serde(flatten)]
    pub counts: ProfileStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_distribution: Option<Vec<GenreShare>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendedMovie>,
    pub recommendation_details: Vec<RecommendationDetail>,
    pub reason: String,
    pub is_personalized: bool,
    pub top_genres: Vec<GenreWeight>,
    pub stats: StatsView,
}

impl From<RecommendationSet> for RecommendationsResponse {
    fn from(set: RecommendationSet) -> Self {
        let recommendation_details = set
            .items
            .iter()
            .map(|r| RecommendationDetail {
                item_id: r.movie.id,
                reason: r.reason.clone(),
                score: (r.score * 100.0).round() / 100.0,
                tier: r.tier,
            })
            .collect();

        let recommendations = set
            .items
            .into_iter()
            .map(|r| RecommendedMovie {
                movie: r.movie,
                recommendation_reason: r.reason,
            })
            .collect();

        let genre_distribution = if set.personalized {
            Some(set.genre_distribution)
        } else {
            None
        };

        Self {
            recommendations,
            recommendation_details,
            reason: set.reason,
            is_personalized: set.personalized,
            top_genres: set.top_genres,
            stats: StatsView {
                counts: set.stats,
                genre_distribution,
            },
        }
    }
}

fn item_id(body: Result<Json<FeedbackRequest>, JsonRejection>) -> AppResult<Uuid> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    request
        .item_id
        .ok_or_else(|| AppError::InvalidInput("itemId is required".to_string()))
}

// Handlers

/// Records that the user opened a movie's details
pub async fn track_view(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let movie_id = item_id(body)?;

    state
        .preferences
        .track_view(user.0, movie_id)
        .await
        .map_err(|e| e.during("Error tracking view"))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user,
        movie_id = %movie_id,
        "View tracked"
    );

    Ok(MessageResponse::new("View tracked successfully"))
}

pub async fn like(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<Json<FeedbackResponse>> {
    let movie_id = item_id(body)?;

    let profile = state
        .preferences
        .like(user.0, movie_id)
        .await
        .map_err(|e| e.during("Error liking movie"))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user,
        movie_id = %movie_id,
        liked = profile.stats().total_liked,
        "Movie liked"
    );

    Ok(Json(FeedbackResponse {
        message: "Movie liked successfully".to_string(),
        preferences: PreferencesView::from(&profile),
    }))
}

pub async fn dislike(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> AppResult<Json<FeedbackResponse>> {
    let movie_id = item_id(body)?;

    let profile = state
        .preferences
        .dislike(user.0, movie_id)
        .await
        .map_err(|e| e.during("Error disliking movie"))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user,
        movie_id = %movie_id,
        disliked = profile.stats().total_disliked,
        "Movie disliked"
    );

    Ok(Json(FeedbackResponse {
        message: "Movie disliked successfully".to_string(),
        preferences: PreferencesView::from(&profile),
    }))
}

pub async fn recommendations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<RecommendationsResponse>> {
    let set = state
        .recommender
        .recommend(user.0)
        .await
        .map_err(|e| e.during("Error getting recommendations"))?;

    Ok(Json(RecommendationsResponse::from(set)))
}

pub async fn preferences(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<PreferencesView>> {
    let profile = state
        .preferences
        .profile(user.0)
        .await
        .map_err(|e| e.during("Error getting preferences"))?;

    Ok(Json(PreferencesView::from(&profile)))
}

pub async fn reset(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<MessageResponse>> {
    state
        .preferences
        .reset(user.0)
        .await
        .map_err(|e| e.during("Error resetting preferences"))?;

    Ok(MessageResponse::new("Preferences reset successfully"))
}

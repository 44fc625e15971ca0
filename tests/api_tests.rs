use std::collections::HashSet;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use serde_json::{json, Value};
use uuid::Uuid;

use reelrank_api::{
    create_router,
    models::{Genre, Movie},
    AppState,
};

const COLD_START_REASON: &str =
    "Top rated movies - Start watching to get personalized recommendations!";

/// Thirty movies cycling through every genre, ratings 6.0 to 8.9
fn test_catalog() -> Vec<Movie> {
    (0..30)
        .map(|i| {
            Movie::new(
                format!("Movie {}", i),
                Genre::ALL[i % Genre::ALL.len()],
                6.0 + i as f64 * 0.1,
            )
        })
        .collect()
}

struct TestApp {
    server: TestServer,
    user: Uuid,
    movies: Vec<Movie>,
}

impl TestApp {
    fn new(movies: Vec<Movie>) -> Self {
        let app = create_router(AppState::in_memory(movies.clone()));
        Self {
            server: TestServer::new(app).unwrap(),
            user: Uuid::new_v4(),
            movies,
        }
    }

    fn as_user(&self, request: TestRequest) -> TestRequest {
        request.add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&self.user.to_string()).unwrap(),
        )
    }

    fn movie(&self, genre: Genre) -> &Movie {
        self.movies.iter().find(|m| m.genre == genre).unwrap()
    }

    async fn feedback(&self, action: &str, movie_id: Uuid) -> Value {
        let response = self
            .as_user(self.server.post(&format!("/api/v1/recommendations/{}", action)))
            .json(&json!({ "itemId": movie_id }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    async fn recommendations(&self) -> Value {
        let response = self
            .as_user(self.server.get("/api/v1/recommendations"))
            .await;
        response.assert_status_ok();
        response.json()
    }

    async fn preferences(&self) -> Value {
        let response = self
            .as_user(self.server.get("/api/v1/recommendations/preferences"))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

fn ids(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new(Vec::new());
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_cold_start_returns_top_rated() {
    let app = TestApp::new(test_catalog().into_iter().take(20).collect());
    let body = app.recommendations().await;

    assert_eq!(body["isPersonalized"], false);
    assert_eq!(body["reason"], COLD_START_REASON);
    assert_eq!(body["topGenres"], json!([]));
    assert_eq!(body["stats"]["totalViewed"], 0);
    assert!(body["stats"].get("genreDistribution").is_none());

    let ratings: Vec<f64> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["rating"].as_f64().unwrap())
        .collect();
    assert_eq!(ratings.len(), 12);
    assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    assert!((ratings[0] - 7.9).abs() < 1e-9);
    assert_eq!(body["recommendationDetails"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_like_adds_double_weight() {
    let app = TestApp::new(test_catalog());
    let drama = app.movie(Genre::Drama).clone();

    let body = app.feedback("like", drama.id).await;
    assert_eq!(body["message"], "Movie liked successfully");
    assert_eq!(
        body["preferences"]["favoriteGenres"],
        json!([{ "genre": "Drama", "count": 2 }])
    );
    assert_eq!(body["preferences"]["likedCount"], 1);

    // Liking again is a no-op
    let body = app.feedback("like", drama.id).await;
    assert_eq!(body["preferences"]["favoriteGenres"][0]["count"], 2);

    let recs = app.recommendations().await;
    assert_eq!(recs["isPersonalized"], true);
    assert_eq!(
        recs["reason"],
        "Based on 1 movies you liked and your love for Drama"
    );
    assert_eq!(recs["stats"]["genreDistribution"][0]["genre"], "Drama");
    assert_eq!(recs["stats"]["genreDistribution"][0]["weight"], 1.0);
}

#[tokio::test]
async fn test_view_then_dislike_keeps_view_weight() {
    let app = TestApp::new(test_catalog());
    let comedy = app.movie(Genre::Comedy).clone();

    let response = app
        .as_user(app.server.post("/api/v1/recommendations/track-view"))
        .json(&json!({ "itemId": comedy.id }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "View tracked successfully");

    let body = app.feedback("dislike", comedy.id).await;
    let prefs = &body["preferences"];
    assert_eq!(prefs["favoriteGenres"], json!([{ "genre": "Comedy", "count": 1 }]));
    assert_eq!(prefs["viewedCount"], 1);
    assert_eq!(prefs["dislikedCount"], 1);
    assert_eq!(prefs["likedCount"], 0);
}

#[tokio::test]
async fn test_dislike_replaces_like() {
    let app = TestApp::new(test_catalog());
    let horror = app.movie(Genre::Horror).clone();

    app.feedback("like", horror.id).await;
    let body = app.feedback("dislike", horror.id).await;
    let prefs = &body["preferences"];

    assert_eq!(prefs["likedCount"], 0);
    assert_eq!(prefs["dislikedCount"], 1);
    assert_eq!(prefs["dislikedMovies"], json!([horror.id]));
    assert_eq!(prefs["favoriteGenres"][0]["count"], 2);
}

#[tokio::test]
async fn test_movie_id_alias_is_accepted() {
    let app = TestApp::new(test_catalog());
    let movie = app.movie(Genre::Thriller).clone();

    let response = app
        .as_user(app.server.post("/api/v1/recommendations/like"))
        .json(&json!({ "movieId": movie.id }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["preferences"]["likedMovies"], json!([movie.id]));
}

#[tokio::test]
async fn test_reset_returns_to_cold_start() {
    let app = TestApp::new(test_catalog());
    app.feedback("like", app.movie(Genre::Romance).id).await;

    let response = app
        .as_user(app.server.delete("/api/v1/recommendations/reset"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Preferences reset successfully");

    let prefs = app.preferences().await;
    assert_eq!(prefs["favoriteGenres"], json!([]));
    assert_eq!(prefs["viewedCount"], 0);
    assert_eq!(prefs["likedCount"], 0);
    assert_eq!(prefs["dislikedCount"], 0);

    let recs = app.recommendations().await;
    assert_eq!(recs["isPersonalized"], false);
}

#[tokio::test]
async fn test_preferences_for_unknown_user_are_empty() {
    let app = TestApp::new(test_catalog());
    let prefs = app.preferences().await;
    assert_eq!(prefs["favoriteGenres"], json!([]));
    assert_eq!(prefs["viewedMovies"], json!([]));
}

#[tokio::test]
async fn test_unknown_movie_is_not_found() {
    let app = TestApp::new(test_catalog());

    for action in ["track-view", "like", "dislike"] {
        let response = app
            .as_user(app.server.post(&format!("/api/v1/recommendations/{}", action)))
            .json(&json!({ "itemId": Uuid::new_v4() }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Movie not found");
    }

    // No profile was created by the failed calls
    let prefs = app.preferences().await;
    assert_eq!(prefs["favoriteGenres"], json!([]));
}

#[tokio::test]
async fn test_missing_item_id_is_bad_request() {
    let app = TestApp::new(test_catalog());
    let response = app
        .as_user(app.server.post("/api/v1/recommendations/like"))
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "itemId is required");
}

#[tokio::test]
async fn test_missing_user_is_unauthorized() {
    let app = TestApp::new(test_catalog());
    let response = app.server.get("/api/v1/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/v1/recommendations/like")
        .json(&json!({ "itemId": app.movies[0].id }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_personalized_list_respects_history() {
    let app = TestApp::new(test_catalog());
    let viewed = app.movie(Genre::Action).clone();
    let liked = app.movie(Genre::Drama).clone();
    let disliked = app
        .movies
        .iter()
        .filter(|m| m.genre == Genre::Drama)
        .nth(1)
        .cloned()
        .unwrap();

    app.as_user(app.server.post("/api/v1/recommendations/track-view"))
        .json(&json!({ "itemId": viewed.id }))
        .await
        .assert_status_ok();
    app.as_user(app.server.post("/api/v1/recommendations/track-view"))
        .json(&json!({ "itemId": liked.id }))
        .await
        .assert_status_ok();
    app.feedback("like", liked.id).await;
    app.feedback("dislike", disliked.id).await;

    let body = app.recommendations().await;
    assert_eq!(body["isPersonalized"], true);
    assert_eq!(body["stats"]["totalViewed"], 2);
    assert_eq!(body["topGenres"][0], json!({ "genre": "Drama", "count": 3 }));

    let ids = ids(&body);
    assert!(!ids.is_empty());
    assert!(ids.len() <= 12);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    for excluded in [viewed.id, liked.id, disliked.id] {
        assert!(!ids.contains(&excluded.to_string()));
    }

    let scores: Vec<f64> = body["recommendationDetails"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_browse_movies() {
    let app = TestApp::new(test_catalog());

    let response = app
        .as_user(app.server.get("/api/v1/movies"))
        .add_query_param("genre", "Drama")
        .await;
    response.assert_status_ok();
    let movies: Vec<Value> = response.json();
    assert_eq!(movies.len(), 3);
    assert!(movies.iter().all(|m| m["genre"] == "Drama"));

    let response = app.as_user(app.server.get("/api/v1/movies")).await;
    let all: Vec<Value> = response.json();
    assert_eq!(all.len(), 30);

    let response = app
        .as_user(app.server.get("/api/v1/movies"))
        .add_query_param("genre", "Western")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let target = &app.movies[4];
    let response = app
        .as_user(app.server.get(&format!("/api/v1/movies/{}", target.id)))
        .await;
    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["title"], target.title);

    let response = app
        .as_user(app.server.get(&format!("/api/v1/movies/{}", Uuid::new_v4())))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

//! End-to-end tests against the router with in-memory repositories.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use movie_api::{build_router, AppState};
use movie_core::repositories::{MovieRepository, ReviewRepository, UserRepository};
use movie_core::services::AuthService;
use movie_core::{DomainError, Movie, NewMovie, NewReview, Review, User};
use movie_security::JwtService;
use movie_shared::MovieId;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

#[derive(Default)]
struct Store {
    movies: Vec<Movie>,
    reviews: Vec<Review>,
    users: Vec<User>,
}

#[derive(Clone, Default)]
struct InMemory(Arc<Mutex<Store>>);

impl InMemory {
    fn movie(&self, id: MovieId) -> Option<Movie> {
        self.0.lock().unwrap().movies.iter().find(|m| m.id == id).cloned()
    }

    fn review_count(&self) -> usize {
        self.0.lock().unwrap().reviews.len()
    }
}

#[async_trait]
impl MovieRepository for InMemory {
    async fn find_all(&self) -> Result<Vec<Movie>, DomainError> {
        Ok(self.0.lock().unwrap().movies.clone())
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, DomainError> {
        Ok(self.movie(id))
    }

    async fn exists(&self, id: MovieId) -> Result<bool, DomainError> {
        Ok(self.movie(id).is_some())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.0.lock().unwrap().movies.len() as i64)
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, DomainError> {
        let mut store = self.0.lock().unwrap();
        let created = Movie {
            id: store.movies.iter().map(|m| m.id).max().unwrap_or(0) + 1,
            title: movie.title.clone(),
            description: movie.description.clone(),
            genre: movie.genre,
            rating_total: movie.rating_total,
            review_count: movie.review_count,
            user_id: movie.user_id,
            user_name: movie.user_name.clone(),
            version: 1,
            created_at: Utc::now(),
            modified_at: None,
        };
        store.movies.push(created.clone());
        Ok(created)
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, DomainError> {
        let mut store = self.0.lock().unwrap();
        let stored = store
            .movies
            .iter_mut()
            .find(|m| m.id == movie.id && m.version == movie.version)
            .ok_or(DomainError::ConcurrencyConflict(movie.id))?;
        *stored = Movie { version: movie.version + 1, ..movie.clone() };
        Ok(stored.clone())
    }

    async fn delete(&self, id: MovieId) -> Result<bool, DomainError> {
        let mut store = self.0.lock().unwrap();
        let before = store.movies.len();
        store.movies.retain(|m| !(m.id == id && m.review_count == 0));
        Ok(store.movies.len() < before)
    }
}

#[async_trait]
impl ReviewRepository for InMemory {
    async fn find_by_movie(&self, movie_id: MovieId) -> Result<Vec<Review>, DomainError> {
        let store = self.0.lock().unwrap();
        Ok(store.reviews.iter().filter(|r| r.movie_id == movie_id).cloned().collect())
    }

    async fn save(&self, review: &NewReview) -> Result<Review, DomainError> {
        let mut store = self.0.lock().unwrap();
        let stored = store
            .movies
            .iter_mut()
            .find(|m| m.id == review.movie_id)
            .ok_or(DomainError::MovieNotFound(review.movie_id))?;
        stored.rating_total += i64::from(review.rating);
        stored.review_count += 1;
        stored.version += 1;

        let saved = Review {
            id: store.reviews.len() as i64 + 1,
            content: review.content.clone(),
            rating: review.rating,
            review_date: review.review_date,
            movie_id: review.movie_id,
            user_id: review.user_id,
            user_name: review.user_name.clone(),
        };
        store.reviews.push(saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl UserRepository for InMemory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.0.lock().unwrap().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_display_name(&self, display_name: &str) -> Result<Option<User>, DomainError> {
        let store = self.0.lock().unwrap();
        Ok(store
            .users
            .iter()
            .find(|u| u.display_name.eq_ignore_ascii_case(display_name))
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        self.0.lock().unwrap().users.push(user.clone());
        Ok(user.clone())
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    store: InMemory,
    jwt: Arc<JwtService>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_login_quota(3)
    }

    fn with_login_quota(login_attempts_per_minute: u32) -> Self {
        let store = InMemory::default();
        let jwt = Arc::new(JwtService::new(SECRET, 3600));
        let auth = Arc::new(AuthService::new(Arc::new(store.clone()), jwt.clone()));
        let state = AppState::new(
            "movie-server",
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            auth,
            login_attempts_per_minute,
        );
        Self { router: build_router(state.clone()), state, store, jwt }
    }

    async fn create_movie(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .send("POST", "/api/v1/movies", Some(token), Some(json!({ "title": title, "genre": "drama" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    fn token(&self, name: &str, role: &str) -> String {
        self.jwt
            .generate_access_token(&Uuid::new_v4(), name, role)
            .unwrap()
    }

    async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

#[tokio::test]
async fn test_review_lifecycle_and_delete_rejection() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");
    let customer = app.token("Chris", "customer");

    let (status, body) = app
        .send("POST", "/api/v1/movies", Some(&member), Some(json!({ "title": "A", "genre": "drama" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["rating_total"], 0);
    assert_eq!(body["data"]["review_count"], 0);
    let id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/movies/{id}");
    let (status, body) = app
        .send("POST", &uri, Some(&customer), Some(json!({ "content": "Great", "rating": 4 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["movie"]["review_count"], 1);
    assert_eq!(body["data"]["movie"]["rating_total"], 4);

    let (status, body) = app
        .send("POST", &uri, Some(&member), Some(json!({ "content": "Meh", "rating": 2 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["movie"]["review_count"], 2);
    assert_eq!(body["data"]["movie"]["rating_total"], 6);
    assert_eq!(body["data"]["movie"]["average_rating"], 3.0);
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 2);

    let (status, body) = app.send("POST", &format!("{uri}/delete"), Some(&member), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "This movie can't be deleted because it has 2 reviews"
    );
    assert_eq!(body["data"]["review_count"], 2);
    assert_eq!(app.store.movie(id).unwrap().review_count, 2);
}

#[tokio::test]
async fn test_delete_unreviewed_movie() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");

    let (_, body) = app
        .send("POST", "/api/v1/movies", Some(&member), Some(json!({ "title": "Gone", "genre": "horror" })))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send("GET", &format!("/api/v1/movies/{id}/delete"), Some(&member), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletable"], true);

    let (status, _) = app
        .send("POST", &format!("/api/v1/movies/{id}/delete"), Some(&member), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &format!("/api/v1/movies/{id}"), Some(&member), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_cannot_create_movie() {
    let app = TestApp::new();
    let customer = app.token("Chris", "customer");

    let (status, _) = app
        .send("POST", "/api/v1/movies", Some(&customer), Some(json!({ "title": "B", "genre": "comedy" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.store.movie(1).is_none());
}

#[tokio::test]
async fn test_edit_with_mismatched_id_leaves_movie_unchanged() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");

    let (_, body) = app
        .send("POST", "/api/v1/movies", Some(&member), Some(json!({ "title": "Original", "genre": "drama" })))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let form = json!({ "id": id + 1, "title": "Changed", "description": "", "genre": "drama", "version": 1 });
    let (status, _) = app
        .send("POST", &format!("/api/v1/movies/{id}/edit"), Some(&member), Some(form))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.movie(id).unwrap().title, "Original");
}

#[tokio::test]
async fn test_edit_updates_editable_fields() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");

    let (_, body) = app
        .send("POST", "/api/v1/movies", Some(&member), Some(json!({ "title": "Draft", "genre": "drama" })))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let form = json!({ "id": id, "title": "Final", "description": "Cut", "genre": "sci_fi", "version": 1 });
    let (status, body) = app
        .send("POST", &format!("/api/v1/movies/{id}/edit"), Some(&member), Some(form))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Final");
    assert_eq!(body["data"]["genre"], "sci_fi");
    assert_eq!(app.store.movie(id).unwrap().version, 2);
}

#[tokio::test]
async fn test_invalid_movie_form_is_echoed() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");

    let (status, body) = app
        .send("POST", "/api/v1/movies", Some(&member), Some(json!({ "title": "  ", "genre": "western" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["genre"], "western");
    assert!(body["error"]["fields"]["title"].is_array());
    assert!(body["error"]["fields"]["genre"].is_array());
}

#[tokio::test]
async fn test_review_for_missing_movie() {
    let app = TestApp::new();
    let customer = app.token("Chris", "customer");

    let (status, _) = app
        .send("POST", "/api/v1/movies/42", Some(&customer), Some(json!({ "content": "Hi", "rating": 3 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.review_count(), 0);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/api/v1/movies", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app.send("GET", "/api/v1/movies", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_home_pages_respect_roles() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");
    let customer = app.token("Chris", "customer");

    assert_eq!(app.send("GET", "/api/v1/home", None, None).await.0, StatusCode::OK);
    assert_eq!(app.send("GET", "/api/v1/home/about", Some(&customer), None).await.0, StatusCode::OK);
    assert_eq!(app.send("GET", "/api/v1/home/about", Some(&member), None).await.0, StatusCode::FORBIDDEN);
    assert_eq!(app.send("GET", "/api/v1/home/contact", Some(&member), None).await.0, StatusCode::OK);
    assert_eq!(app.send("GET", "/api/v1/home/contact", Some(&customer), None).await.0, StatusCode::FORBIDDEN);
    assert_eq!(app.send("GET", "/api/v1/home/analytics", None, None).await.0, StatusCode::OK);
    assert_eq!(app.send("GET", "/api/v1/home/privacy", None, None).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();
    let form = json!({
        "display_name": "Robin",
        "email": "Robin@Example.com",
        "password": "Velvet-Popcorn-Matinee-42"
    });

    let (status, body) = app.send("POST", "/api/v1/auth/register", None, Some(form)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "customer");

    let login = json!({ "email": "robin@example.com", "password": "Velvet-Popcorn-Matinee-42" });
    let (status, body) = app.send("POST", "/api/v1/auth/login", None, Some(login)).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = app.send("GET", "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Robin");
    assert_eq!(body["data"]["role"], "customer");
}

#[tokio::test]
async fn test_login_is_throttled() {
    let app = TestApp::new();
    let login = json!({ "email": "nobody@example.com", "password": "wrong-password" });

    for _ in 0..3 {
        let (status, _) = app.send("POST", "/api/v1/auth/login", None, Some(login.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = app.send("POST", "/api/v1/auth/login", None, Some(login)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_invalid_review_is_redisplayed() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");
    let id = app.create_movie(&member, "A").await;

    let (status, body) = app
        .send("POST", &format!("/api/v1/movies/{id}"), Some(&member), Some(json!({ "content": "Great", "rating": 9 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], json!({ "content": "Great", "rating": 9 }));
    assert!(body["error"]["fields"]["rating"].is_array());
    assert_eq!(app.store.review_count(), 0);
}

#[tokio::test]
async fn test_unreadable_review_body_is_redisplayed() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");
    let id = app.create_movie(&member, "A").await;

    let (status, body) = app
        .send("POST", &format!("/api/v1/movies/{id}"), Some(&member), Some(json!({ "content": "Great" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["data"], json!({ "content": "Great" }));
    assert!(body["error"]["fields"]["rating"].is_array());

    let (status, body) = app
        .send("POST", &format!("/api/v1/movies/{id}"), Some(&member), Some(json!({ "content": "Great", "rating": "five" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["data"]["rating"], "five");
    assert_eq!(app.store.review_count(), 0);
}

#[tokio::test]
async fn test_edit_missing_movie_is_not_found() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");

    let form = json!({ "id": 77, "title": "Ghost", "description": "", "genre": "drama", "version": 1 });
    let (status, body) = app
        .send("POST", "/api/v1/movies/77/edit", Some(&member), Some(form))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = app.send("GET", "/api/v1/movies/77/edit", Some(&member), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_reviews_all_count() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");
    let customer = app.token("Chris", "customer");
    let id = app.create_movie(&member, "A").await;
    let uri = format!("/api/v1/movies/{id}");

    let (first, second) = tokio::join!(
        app.send("POST", &uri, Some(&member), Some(json!({ "content": "Good", "rating": 4 }))),
        app.send("POST", &uri, Some(&customer), Some(json!({ "content": "Fine", "rating": 3 }))),
    );
    assert_eq!(first.0, StatusCode::CREATED);
    assert_eq!(second.0, StatusCode::CREATED);

    let movie = app.store.movie(id).unwrap();
    assert_eq!(movie.review_count, 2);
    assert_eq!(movie.rating_total, 7);
}

#[tokio::test]
async fn test_review_after_edit_still_counts() {
    let app = TestApp::new();
    let member = app.token("Marta", "member");
    let id = app.create_movie(&member, "A").await;
    let uri = format!("/api/v1/movies/{id}");

    let (status, _) = app.send("POST", &uri, Some(&member), Some(json!({ "content": "Good", "rating": 4 }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let form = json!({ "id": id, "title": "A (restored)", "description": "", "genre": "drama", "version": 2 });
    let (status, _) = app.send("POST", &format!("{uri}/edit"), Some(&member), Some(form)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("POST", &uri, Some(&member), Some(json!({ "content": "Again", "rating": 2 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["movie"]["review_count"], 2);
    assert_eq!(body["data"]["movie"]["rating_total"], 6);
    assert_eq!(body["data"]["movie"]["title"], "A (restored)");
}

#[tokio::test]
async fn test_idle_login_keys_are_pruned() {
    let app = TestApp::with_login_quota(1000);
    let login = json!({ "email": "nobody@example.com", "password": "wrong-password" });

    let (status, _) = app.send("POST", "/api/v1/auth/login", None, Some(login)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.login_limiter.len(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;
    app.state.prune_login_limiter();
    assert_eq!(app.state.login_limiter.len(), 0);
}

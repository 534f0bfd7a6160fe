//! Shared handler state

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use movie_core::repositories::{MovieRepository, ReviewRepository};
use movie_core::services::{AuthService, MovieService, ReviewService};

/// Login attempts are throttled per normalized email.
pub type LoginLimiter = DefaultKeyedRateLimiter<String>;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub movie_service: Arc<MovieService>,
    pub review_service: Arc<ReviewService>,
    pub auth_service: Arc<AuthService>,
    pub login_limiter: Arc<LoginLimiter>,
}

impl AppState {
    pub fn new(
        app_name: impl Into<String>,
        movies: Arc<dyn MovieRepository>,
        reviews: Arc<dyn ReviewRepository>,
        auth_service: Arc<AuthService>,
        login_attempts_per_minute: u32,
    ) -> Self {
        let per_minute = NonZeroU32::new(login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            app_name: app_name.into(),
            movie_service: Arc::new(MovieService::new(movies.clone(), reviews.clone())),
            review_service: Arc::new(ReviewService::new(movies, reviews)),
            auth_service,
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
        }
    }

    /// Forgets login keys whose quota has fully replenished. Keys are chosen
    /// by clients, so this must run periodically to bound memory.
    pub fn prune_login_limiter(&self) {
        self.login_limiter.retain_recent();
        self.login_limiter.shrink_to_fit();
        tracing::debug!(keys = self.login_limiter.len(), "Pruned login limiter");
    }
}

// ============================================================================
// Movie Core - Review Submission Service
// File: crates/movie-core/src/services/review_service.rs
// ============================================================================
//! Records new reviews against a movie.

use std::sync::Arc;
use tracing::{info, warn};

use movie_shared::MovieId;

use super::movie_service::load_details;
use crate::access::{authorize, Policy};
use crate::domain::{CurrentUser, MovieDetails, NewReview, ReviewForm};
use crate::error::DomainError;
use crate::repositories::{MovieRepository, ReviewRepository};

pub struct ReviewService {
    movies: Arc<dyn MovieRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    pub fn new(movies: Arc<dyn MovieRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { movies, reviews }
    }

    /// Records a review and folds its rating into the movie aggregate.
    /// Returns the refreshed details bundle. Other writes to the movie in the
    /// meantime do not make the submission fail.
    pub async fn submit(
        &self,
        user: &CurrentUser,
        movie_id: MovieId,
        form: &ReviewForm,
    ) -> Result<MovieDetails, DomainError> {
        authorize(user, Policy::Authenticated)?;

        let review = NewReview::from_form(form, movie_id, user)?;

        if !self.movies.exists(movie_id).await? {
            warn!(movie_id, "Review submitted for missing movie");
            return Err(DomainError::MovieNotFound(movie_id));
        }

        let saved = self.reviews.save(&review).await?;
        info!(
            movie_id,
            review_id = saved.id,
            user_id = %user.id,
            rating = saved.rating,
            "Review recorded"
        );

        load_details(self.movies.as_ref(), self.reviews.as_ref(), movie_id).await
    }
}

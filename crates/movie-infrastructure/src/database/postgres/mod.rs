//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod movie_repo_impl;
pub mod review_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use movie_repo_impl::PgMovieRepository;
pub use review_repo_impl::PgReviewRepository;

use tracing::error;

use movie_core::error::DomainError;

/// Logs a driver error and converts it into `DomainError::DatabaseError`.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

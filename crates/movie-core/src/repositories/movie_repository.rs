//! Movie repository trait (port)

use async_trait::async_trait;

use movie_shared::MovieId;

use crate::domain::{Movie, NewMovie};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Movie>, DomainError>;
    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, DomainError>;
    async fn exists(&self, id: MovieId) -> Result<bool, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
    async fn create(&self, movie: &NewMovie) -> Result<Movie, DomainError>;

    /// Writes `movie` if the stored version still equals `movie.version`.
    /// Fails with `ConcurrencyConflict` when no row matched.
    async fn update(&self, movie: &Movie) -> Result<Movie, DomainError>;

    /// Returns `false` when no row was removed.
    async fn delete(&self, id: MovieId) -> Result<bool, DomainError>;
}

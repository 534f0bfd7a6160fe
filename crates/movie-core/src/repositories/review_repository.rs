//! Review repository trait (port)

use async_trait::async_trait;

use movie_shared::MovieId;

use crate::domain::{NewReview, Review};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_movie(&self, movie_id: MovieId) -> Result<Vec<Review>, DomainError>;

    /// Inserts `review` and adds its rating to the movie aggregate in one
    /// transaction. The aggregate is incremented in place, so concurrent
    /// reviews of the same movie all count. Fails with `MovieNotFound` when
    /// the movie row is gone; nothing is persisted then.
    async fn save(&self, review: &NewReview) -> Result<Review, DomainError>;
}

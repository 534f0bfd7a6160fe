// ============================================================================
// Movie Infrastructure - PostgreSQL Review Repository
// File: crates/movie-infrastructure/src/database/postgres/review_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use movie_core::domain::{NewReview, Review};
use movie_core::error::DomainError;
use movie_core::repositories::ReviewRepository;
use movie_shared::MovieId;

use super::db_error;

const REVIEW_COLUMNS: &str = "id, content, rating, review_date, movie_id, user_id, user_name";

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    pub id: i64,
    pub content: String,
    pub rating: i32,
    pub review_date: DateTime<Utc>,
    pub movie_id: i64,
    pub user_id: Uuid,
    pub user_name: String,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            content: row.content,
            rating: row.rating,
            review_date: row.review_date,
            movie_id: row.movie_id,
            user_id: row.user_id,
            user_name: row.user_name,
        }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn find_by_movie(&self, movie_id: MovieId) -> Result<Vec<Review>, DomainError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {} FROM reviews WHERE movie_id = $1 ORDER BY review_date, id",
            REVIEW_COLUMNS
        ))
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing reviews"))?;

        debug!("Loaded {} reviews for movie {}", rows.len(), movie_id);
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn save(&self, review: &NewReview) -> Result<Review, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("starting review transaction"))?;

        // Row lock on the movie serializes concurrent reviews and deletes.
        let updated = sqlx::query(
            r#"
            UPDATE movies
            SET
                rating_total = rating_total + $2,
                review_count = review_count + 1,
                version = version + 1,
                modified_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(review.movie_id)
        .bind(i64::from(review.rating))
        .execute(&mut *tx)
        .await
        .map_err(db_error("updating movie aggregate"))?;

        if updated.rows_affected() == 0 {
            warn!(movie_id = review.movie_id, "Movie removed before review could be saved");
            tx.rollback().await.map_err(db_error("rolling back review transaction"))?;
            return Err(DomainError::MovieNotFound(review.movie_id));
        }

        let row: ReviewRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO reviews (content, rating, review_date, movie_id, user_id, user_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(&review.content)
        .bind(review.rating)
        .bind(review.review_date)
        .bind(review.movie_id)
        .bind(review.user_id)
        .bind(&review.user_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("inserting review"))?;

        tx.commit().await.map_err(db_error("committing review transaction"))?;
        Ok(row.into())
    }
}

// ============================================================================
// Movie Infrastructure - PostgreSQL Movie Repository
// File: crates/movie-infrastructure/src/database/postgres/movie_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use movie_core::domain::{Genre, Movie, NewMovie};
use movie_core::error::DomainError;
use movie_core::repositories::MovieRepository;
use movie_shared::MovieId;

use super::db_error;

const MOVIE_COLUMNS: &str = "id, title, description, genre, rating_total, review_count, \
     user_id, user_name, version, created_at, modified_at";

pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MovieRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub rating_total: i64,
    pub review_count: i32,
    pub user_id: Uuid,
    pub user_name: String,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<MovieRow> for Movie {
    type Error = DomainError;

    fn try_from(row: MovieRow) -> Result<Self, Self::Error> {
        let genre = Genre::from_str(&row.genre)
            .ok_or_else(|| DomainError::DatabaseError(format!("unknown genre '{}' for movie {}", row.genre, row.id)))?;
        Ok(Movie {
            id: row.id,
            title: row.title,
            description: row.description,
            genre,
            rating_total: row.rating_total,
            review_count: row.review_count,
            user_id: row.user_id,
            user_name: row.user_name,
            version: row.version,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, DomainError> {
        let rows: Vec<MovieRow> = sqlx::query_as(&format!(
            "SELECT {} FROM movies ORDER BY id",
            MOVIE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing movies"))?;

        debug!("Loaded {} movies", rows.len());
        rows.into_iter().map(Movie::try_from).collect()
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, DomainError> {
        let row: Option<MovieRow> = sqlx::query_as(&format!(
            "SELECT {} FROM movies WHERE id = $1",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding movie by id"))?;

        row.map(Movie::try_from).transpose()
    }

    async fn exists(&self, id: MovieId) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("checking movie existence"))
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("counting movies"))
    }

    async fn create(&self, movie: &NewMovie) -> Result<Movie, DomainError> {
        let row: MovieRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO movies (title, description, genre, rating_total, review_count, user_id, user_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        ))
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.genre.as_str())
        .bind(movie.rating_total)
        .bind(movie.review_count)
        .bind(movie.user_id)
        .bind(&movie.user_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("creating movie"))?;

        info!(movie_id = row.id, "Movie row inserted");
        row.try_into()
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, DomainError> {
        let row: Option<MovieRow> = sqlx::query_as(&format!(
            r#"
            UPDATE movies
            SET
                title = $2,
                description = $3,
                genre = $4,
                version = version + 1,
                modified_at = NOW()
            WHERE id = $1 AND version = $5
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        ))
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.genre.as_str())
        .bind(movie.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("updating movie"))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(DomainError::ConcurrencyConflict(movie.id)),
        }
    }

    async fn delete(&self, id: MovieId) -> Result<bool, DomainError> {
        // Guarded so a review landing after the caller's check keeps the row.
        let result = sqlx::query("DELETE FROM movies WHERE id = $1 AND review_count = 0")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("deleting movie"))?;

        Ok(result.rows_affected() > 0)
    }
}

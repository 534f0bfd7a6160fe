// ============================================================================
// Movie Infrastructure - PostgreSQL User Repository
// File: crates/movie-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use movie_core::domain::{Role, User};
use movie_core::error::DomainError;
use movie_core::repositories::UserRepository;

use super::db_error;

const USER_COLUMNS: &str = "id, display_name, email, password_hash, role, created_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .ok_or_else(|| DomainError::DatabaseError(format!("unknown role '{}' for user {}", row.role, row.id)))?;
        Ok(User {
            id: row.id,
            display_name: row.display_name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user by email"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_display_name(&self, display_name: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE LOWER(display_name) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding user by display_name"))?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        info!(user_id = %user.id, "Creating user");

        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, display_name, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let constraint = e
                .as_database_error()
                .and_then(|db| db.constraint())
                .map(str::to_string);
            match constraint.as_deref() {
                Some("users_email_key") => DomainError::EmailAlreadyExists(user.email.clone()),
                Some("users_display_name_lower_idx") => {
                    DomainError::DisplayNameAlreadyExists(user.display_name.clone())
                }
                _ => {
                    error!("Database error creating user: {}", e);
                    DomainError::DatabaseError(e.to_string())
                }
            }
        })?;

        row.try_into()
    }
}

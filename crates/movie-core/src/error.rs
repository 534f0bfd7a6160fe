//! Domain errors

use thiserror::Error;
use validator::ValidationErrors;

use movie_shared::MovieId;

use crate::domain::{Movie, Role};

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Movie not found: {0}")]
    MovieNotFound(MovieId),

    #[error("Movie id mismatch: path {path} does not match body {body}")]
    MovieIdMismatch { path: MovieId, body: MovieId },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Role {required} required")]
    Forbidden { required: Role },

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Display name already exists: {0}")]
    DisplayNameAlreadyExists(String),

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password too weak")]
    PasswordTooWeak,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Business rule: movies with reviews cannot be deleted.
    #[error("{}", .movie.not_deletable_message())]
    MovieNotDeletable { movie: Box<Movie> },

    #[error("Concurrent modification of movie {0}")]
    ConcurrencyConflict(MovieId),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Missing or mismatched identifiers surface as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::MovieNotFound(_) | DomainError::MovieIdMismatch { .. }
        )
    }
}

impl From<movie_security::PasswordError> for DomainError {
    fn from(e: movie_security::PasswordError) -> Self {
        use movie_security::PasswordError;
        match e {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::TooWeak => DomainError::PasswordTooWeak,
            PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
        }
    }
}

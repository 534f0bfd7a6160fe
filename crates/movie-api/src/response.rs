//! API Response wrapper

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use movie_core::domain::{Movie, MovieDetails, Review};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Failed operation that still hands back data to redisplay
    /// (submitted form, or the record the operation refused to touch).
    pub fn rejected(data: Option<T>, error: ErrorBody) -> Self {
        Self {
            success: false,
            data,
            error: Some(error),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: &str, message: &str) -> Self {
        Self::rejected(
            None,
            ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                fields: BTreeMap::new(),
            },
        )
    }
}

/// Movie as presented to clients, with the derived average.
#[derive(Debug, Serialize)]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    pub average_rating: f64,
}

impl From<Movie> for MovieView {
    fn from(movie: Movie) -> Self {
        let average_rating = movie.average_rating();
        Self { movie, average_rating }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailsView {
    pub movie: MovieView,
    pub reviews: Vec<Review>,
}

impl From<MovieDetails> for MovieDetailsView {
    fn from(details: MovieDetails) -> Self {
        Self {
            movie: details.movie.into(),
            reviews: details.reviews,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteConfirmView {
    pub movie: MovieView,
    pub deletable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Movie> for DeleteConfirmView {
    fn from(movie: Movie) -> Self {
        let deletable = movie.is_deletable();
        let message = (!deletable).then(|| movie.not_deletable_message());
        Self { movie: movie.into(), deletable, message }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedView {
    pub id: i64,
    pub deleted_at: DateTime<Utc>,
}

// ============================================================================
// Movie Core - Movie Entity
// File: crates/movie-core/src/domain/movie.rs
// Description: Catalog entry with its review aggregate
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use movie_shared::MovieId;

use super::{CurrentUser, Review};

/// Movie genre enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Documentary,
    Drama,
    Fantasy,
    Horror,
    Romance,
    SciFi,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 11] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::Animation => "animation",
            Genre::Comedy => "comedy",
            Genre::Documentary => "documentary",
            Genre::Drama => "drama",
            Genre::Fantasy => "fantasy",
            Genre::Horror => "horror",
            Genre::Romance => "romance",
            Genre::SciFi => "sci_fi",
            Genre::Thriller => "thriller",
        }
    }

    /// Accepts the stored form as well as display spellings ("Sci-Fi", "Drama").
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "action" => Some(Genre::Action),
            "adventure" => Some(Genre::Adventure),
            "animation" => Some(Genre::Animation),
            "comedy" => Some(Genre::Comedy),
            "documentary" => Some(Genre::Documentary),
            "drama" => Some(Genre::Drama),
            "fantasy" => Some(Genre::Fantasy),
            "horror" => Some(Genre::Horror),
            "romance" => Some(Genre::Romance),
            "scifi" => Some(Genre::SciFi),
            "thriller" => Some(Genre::Thriller),
            _ => None,
        }
    }
}

/// Movie entity.
///
/// `rating_total` is the running sum of every submitted rating; the average
/// is derived from it together with `review_count` and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub rating_total: i64,
    pub review_count: i32,
    pub user_id: Uuid,
    pub user_name: String,
    /// Optimistic concurrency token, bumped by every write.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Movie {
    pub fn average_rating(&self) -> f64 {
        if self.review_count <= 0 {
            0.0
        } else {
            self.rating_total as f64 / self.review_count as f64
        }
    }

    pub fn is_deletable(&self) -> bool {
        self.review_count == 0
    }

    pub fn not_deletable_message(&self) -> String {
        format!(
            "This movie can't be deleted because it has {} reviews",
            self.review_count
        )
    }

    /// Copies the editable fields of an update form. Aggregate and ownership
    /// fields stay server-controlled.
    pub fn apply_update(&mut self, form: &MovieUpdateForm, genre: Genre) {
        self.title = form.title.trim().to_string();
        self.description = form.description.trim().to_string();
        self.genre = genre;
        self.version = form.version;
        self.modified_at = Some(Utc::now());
    }
}

/// Movie row about to be inserted; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub rating_total: i64,
    pub review_count: i32,
    pub user_id: Uuid,
    pub user_name: String,
}

impl NewMovie {
    pub fn from_form(form: &MovieForm, owner: &CurrentUser) -> Result<Self, ValidationErrors> {
        let genre = form.check()?;
        Ok(Self {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            genre,
            rating_total: 0,
            review_count: 0,
            user_id: owner.id,
            user_name: owner.name.clone(),
        })
    }
}

/// Create-movie input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MovieForm {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: String,

    pub genre: String,
}

impl MovieForm {
    /// Runs field validation and resolves the genre.
    pub fn check(&self) -> Result<Genre, ValidationErrors> {
        check_fields(self.validate(), &self.title, &self.genre)
    }
}

/// Edit-movie input
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MovieUpdateForm {
    pub id: MovieId,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: String,

    pub genre: String,

    pub version: i32,
}

impl MovieUpdateForm {
    pub fn check(&self) -> Result<Genre, ValidationErrors> {
        check_fields(self.validate(), &self.title, &self.genre)
    }
}

fn check_fields(
    derived: Result<(), ValidationErrors>,
    title: &str,
    genre: &str,
) -> Result<Genre, ValidationErrors> {
    let mut errors = derived.err().unwrap_or_else(ValidationErrors::new);

    if !title.is_empty() && title.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Title must not be blank".into());
        errors.add("title", error);
    }

    let parsed = Genre::from_str(genre);
    if parsed.is_none() {
        let mut error = ValidationError::new("unknown_genre");
        error.message = Some(format!("Unknown genre: {}", genre).into());
        errors.add("genre", error);
    }

    match parsed {
        Some(genre) if errors.is_empty() => Ok(genre),
        _ => Err(errors),
    }
}

/// Details bundle: a movie together with its reviews.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    pub movie: Movie,
    pub reviews: Vec<Review>,
}

// ============================================================================
// Movie Core - Review Entity
// File: crates/movie-core/src/domain/review.rs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use movie_shared::constants::{MAX_RATING, MIN_RATING};
use movie_shared::{MovieId, ReviewId};

use super::CurrentUser;

/// Stored review. Reviews are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub content: String,
    pub rating: i32,
    pub review_date: DateTime<Utc>,
    pub movie_id: MovieId,
    pub user_id: Uuid,
    pub user_name: String,
}

/// Submitted review form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewForm {
    #[validate(length(min = 1, max = 2000, message = "Review must be between 1 and 2000 characters"))]
    pub content: String,

    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
}

/// Review about to be inserted, stamped with author and server time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub content: String,
    pub rating: i32,
    pub review_date: DateTime<Utc>,
    pub movie_id: MovieId,
    pub user_id: Uuid,
    pub user_name: String,
}

impl NewReview {
    pub fn from_form(
        form: &ReviewForm,
        movie_id: MovieId,
        author: &CurrentUser,
    ) -> Result<Self, ValidationErrors> {
        form.validate()?;
        Ok(Self {
            content: form.content.trim().to_string(),
            rating: form.rating,
            review_date: Utc::now(),
            movie_id,
            user_id: author.id,
            user_name: author.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn author() -> CurrentUser {
        CurrentUser { id: Uuid::new_v4(), name: "Dan".to_string(), role: Role::Customer }
    }

    #[test]
    fn test_review_is_stamped_with_author() {
        let before = Utc::now();
        let form = ReviewForm { content: "Great".to_string(), rating: 4 };
        let review = NewReview::from_form(&form, 9, &author()).unwrap();
        assert_eq!(review.movie_id, 9);
        assert_eq!(review.user_name, "Dan");
        assert!(review.review_date >= before);
    }

    #[test]
    fn test_rating_bounds() {
        for rating in [0, 6, -1] {
            let form = ReviewForm { content: "Meh".to_string(), rating };
            assert!(NewReview::from_form(&form, 1, &author()).is_err(), "rating {}", rating);
        }
        for rating in [MIN_RATING, MAX_RATING] {
            let form = ReviewForm { content: "Fine".to_string(), rating };
            assert!(NewReview::from_form(&form, 1, &author()).is_ok(), "rating {}", rating);
        }
        let form = ReviewForm { content: String::new(), rating: 3 };
        assert!(NewReview::from_form(&form, 1, &author()).is_err());
    }
}

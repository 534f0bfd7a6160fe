// ============================================================================
// Movie Core - User Entity
// File: crates/movie-core/src/domain/user.rs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Role;

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Display name must be between 2 and 100 characters"))]
    pub display_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        display_name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: movie_shared::new_user_id(),
            display_name: display_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            created_at: Utc::now(),
        };

        user.validate()?;
        Ok(user)
    }

    pub fn as_current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            name: self.display_name.clone(),
            role: self.role,
        }
    }
}

/// Identity of the authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

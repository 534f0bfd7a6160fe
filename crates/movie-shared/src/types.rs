//! Common types

use uuid::Uuid;

pub type UserId = Uuid;
pub type MovieId = i64;
pub type ReviewId = i64;

pub fn new_user_id() -> UserId {
    Uuid::new_v4()
}

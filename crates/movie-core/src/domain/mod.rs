//! # Movie Core - Domain Module
//! 
//! Domain entities for the movie review service.

pub mod role;
pub mod user;
pub mod movie;
pub mod review;

// Re-export all entities and enums
pub use role::Role;
pub use user::{CurrentUser, User};
pub use movie::{Genre, Movie, MovieDetails, MovieForm, MovieUpdateForm, NewMovie};
pub use review::{NewReview, Review, ReviewForm};

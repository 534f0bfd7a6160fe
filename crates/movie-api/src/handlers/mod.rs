//! Route handlers

pub mod auth;
pub mod health;
pub mod home;
pub mod movies;
pub mod reviews;

/// Where clients land after a movie is created, edited or deleted.
pub const MOVIES_INDEX: &str = "/api/v1/movies";

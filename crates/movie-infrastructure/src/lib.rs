//! # Movie Infrastructure
//! 
//! PostgreSQL implementations of the repository ports.

pub mod database;

pub use database::{create_pool, run_migrations, PgMovieRepository, PgReviewRepository, PgUserRepository};

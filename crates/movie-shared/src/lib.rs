//! # Movie Shared
//! 
//! Shared configuration, types, and telemetry for the movie review service.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;

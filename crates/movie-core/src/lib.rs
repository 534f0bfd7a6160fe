//! # Movie Core
//! 
//! Domain entities, access policies, services, and repository traits for the
//! movie review service.

pub mod domain;
pub mod access;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use access::{authorize, Policy};
pub use error::DomainError;

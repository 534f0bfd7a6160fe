//! Domain services (business logic)

pub mod auth_service;
pub mod movie_service;
pub mod review_service;
pub mod seed_service;

pub use auth_service::{AuthService, LoginResult, RegisterForm, UserInfo};
pub use movie_service::MovieService;
pub use review_service::ReviewService;
pub use seed_service::{SeedReport, SeedService};

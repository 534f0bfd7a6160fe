//! Repository traits (ports)

pub mod movie_repository;
pub mod review_repository;
pub mod user_repository;

pub use movie_repository::MovieRepository;
pub use review_repository::ReviewRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use movie_repository::MockMovieRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

// ============================================================================
// Movie Core - Startup Seeding
// File: crates/movie-core/src/services/seed_service.rs
// ============================================================================
//! Creates configured accounts and, on an empty catalog, sample movies.

use std::sync::Arc;
use tracing::{info, warn};

use movie_shared::config::SeedSettings;

use super::AuthService;
use crate::domain::{CurrentUser, Genre, NewMovie, Role};
use crate::error::DomainError;
use crate::repositories::{MovieRepository, UserRepository};

const SAMPLE_MOVIES: &[(&str, &str, Genre)] = &[
    ("The Godfather", "The aging patriarch of a crime dynasty hands control to his reluctant son.", Genre::Drama),
    ("Spirited Away", "A girl wanders into a world of spirits and must free her parents.", Genre::Animation),
    ("Alien", "The crew of a commercial towing ship answers a distress call.", Genre::SciFi),
    ("Paddington 2", "A bear takes an odd job to buy a gift and is framed for theft.", Genre::Comedy),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_created: usize,
    pub users_existing: usize,
    pub movies_created: usize,
}

pub struct SeedService {
    auth: Arc<AuthService>,
    users: Arc<dyn UserRepository>,
    movies: Arc<dyn MovieRepository>,
}

impl SeedService {
    pub fn new(
        auth: Arc<AuthService>,
        users: Arc<dyn UserRepository>,
        movies: Arc<dyn MovieRepository>,
    ) -> Self {
        Self { auth, users, movies }
    }

    pub async fn run(&self, settings: &SeedSettings) -> Result<SeedReport, DomainError> {
        let mut report = SeedReport::default();
        let mut owner: Option<CurrentUser> = None;

        for seed in &settings.users {
            let role = Role::from_str(&seed.role).ok_or_else(|| {
                DomainError::InternalError(format!("unknown role '{}' for seed user {}", seed.role, seed.display_name))
            })?;

            let user = match self.users.find_by_email(&seed.email.trim().to_lowercase()).await? {
                Some(existing) => {
                    report.users_existing += 1;
                    existing
                }
                None => {
                    report.users_created += 1;
                    self.auth
                        .create_account(&seed.display_name, &seed.email, &seed.password, role)
                        .await?
                }
            };

            if owner.is_none() && user.role == Role::Member {
                owner = Some(user.as_current_user());
            }
        }

        if settings.sample_movies {
            report.movies_created = self.seed_movies(owner.as_ref()).await?;
        }

        info!(
            users_created = report.users_created,
            users_existing = report.users_existing,
            movies_created = report.movies_created,
            "Seeding finished"
        );
        Ok(report)
    }

    async fn seed_movies(&self, owner: Option<&CurrentUser>) -> Result<usize, DomainError> {
        if self.movies.count().await? > 0 {
            return Ok(0);
        }
        let Some(owner) = owner else {
            warn!("Sample movies requested but no member account is seeded");
            return Ok(0);
        };

        for (title, description, genre) in SAMPLE_MOVIES {
            let movie = NewMovie {
                title: title.to_string(),
                description: description.to_string(),
                genre: *genre,
                rating_total: 0,
                review_count: 0,
                user_id: owner.id,
                user_name: owner.name.clone(),
            };
            self.movies.create(&movie).await?;
        }
        Ok(SAMPLE_MOVIES.len())
    }
}

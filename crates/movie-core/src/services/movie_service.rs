// ============================================================================
// Movie Core - Movie Management Service
// File: crates/movie-core/src/services/movie_service.rs
// ============================================================================
//! List, show, create, edit and delete catalog entries.

use std::sync::Arc;
use tracing::{error, info, warn};

use movie_shared::MovieId;

use crate::access::{authorize, Policy};
use crate::domain::{CurrentUser, Genre, Movie, MovieDetails, MovieForm, MovieUpdateForm, NewMovie};
use crate::error::DomainError;
use crate::repositories::{MovieRepository, ReviewRepository};

pub struct MovieService {
    movies: Arc<dyn MovieRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl MovieService {
    pub fn new(movies: Arc<dyn MovieRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { movies, reviews }
    }

    /// All movies, unfiltered.
    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<Movie>, DomainError> {
        authorize(user, Policy::Authenticated)?;
        self.movies.find_all().await
    }

    pub async fn details(&self, user: &CurrentUser, id: MovieId) -> Result<MovieDetails, DomainError> {
        authorize(user, Policy::Authenticated)?;
        load_details(self.movies.as_ref(), self.reviews.as_ref(), id).await
    }

    /// Genres offered by the create form.
    pub fn create_form(&self, user: &CurrentUser) -> Result<&'static [Genre], DomainError> {
        authorize(user, Policy::MembersOnly)?;
        Ok(&Genre::ALL)
    }

    pub async fn create(&self, user: &CurrentUser, form: &MovieForm) -> Result<Movie, DomainError> {
        authorize(user, Policy::MembersOnly)?;

        let new_movie = NewMovie::from_form(form, user)?;
        let movie = self.movies.create(&new_movie).await?;

        info!(movie_id = movie.id, user_id = %user.id, "Movie created: {}", movie.title);
        Ok(movie)
    }

    pub async fn edit_form(&self, user: &CurrentUser, id: MovieId) -> Result<Movie, DomainError> {
        authorize(user, Policy::MembersOnly)?;
        self.find(id).await
    }

    pub async fn update(
        &self,
        user: &CurrentUser,
        path_id: MovieId,
        form: &MovieUpdateForm,
    ) -> Result<Movie, DomainError> {
        authorize(user, Policy::MembersOnly)?;

        if path_id != form.id {
            warn!(path_id, body_id = form.id, "Movie update id mismatch");
            return Err(DomainError::MovieIdMismatch { path: path_id, body: form.id });
        }

        let genre = form.check()?;
        let mut movie = self.find(path_id).await?;
        movie.apply_update(form, genre);

        match self.movies.update(&movie).await {
            Ok(updated) => {
                info!(movie_id = updated.id, version = updated.version, "Movie updated");
                Ok(updated)
            }
            Err(DomainError::ConcurrencyConflict(id)) => {
                if !self.movies.exists(id).await? {
                    warn!(movie_id = id, "Movie removed during update");
                    return Err(DomainError::MovieNotFound(id));
                }
                error!(movie_id = id, "Concurrent modification during update");
                Err(DomainError::ConcurrencyConflict(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete confirmation view.
    pub async fn delete_confirm(&self, user: &CurrentUser, id: MovieId) -> Result<Movie, DomainError> {
        authorize(user, Policy::MembersOnly)?;
        self.find(id).await
    }

    pub async fn delete(&self, user: &CurrentUser, id: MovieId) -> Result<(), DomainError> {
        authorize(user, Policy::MembersOnly)?;

        let movie = self.find(id).await?;
        if !movie.is_deletable() {
            warn!(movie_id = id, review_count = movie.review_count, "Refusing to delete reviewed movie");
            return Err(DomainError::MovieNotDeletable { movie: Box::new(movie) });
        }

        if !self.movies.delete(id).await? {
            // A review or another delete got in first.
            return match self.movies.find_by_id(id).await? {
                Some(movie) => Err(DomainError::MovieNotDeletable { movie: Box::new(movie) }),
                None => Err(DomainError::MovieNotFound(id)),
            };
        }

        info!(movie_id = id, user_id = %user.id, "Movie deleted");
        Ok(())
    }

    async fn find(&self, id: MovieId) -> Result<Movie, DomainError> {
        self.movies
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MovieNotFound(id))
    }
}

/// Loads a movie together with all of its reviews.
pub(crate) async fn load_details(
    movies: &dyn MovieRepository,
    reviews: &dyn ReviewRepository,
    id: MovieId,
) -> Result<MovieDetails, DomainError> {
    let movie = movies
        .find_by_id(id)
        .await?
        .ok_or(DomainError::MovieNotFound(id))?;
    let reviews = reviews.find_by_movie(id).await?;
    Ok(MovieDetails { movie, reviews })
}

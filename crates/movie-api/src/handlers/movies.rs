//! Movie catalog handlers

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderName, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use movie_core::{Genre, MovieForm, MovieUpdateForm};
use movie_shared::MovieId;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AuthUser, JsonForm};
use crate::handlers::MOVIES_INDEX;
use crate::response::{ApiResponse, DeleteConfirmView, DeletedView, MovieDetailsView, MovieView};
use crate::state::AppState;

type Located<T> = ([(HeaderName, &'static str); 1], Json<ApiResponse<T>>);

#[derive(Serialize)]
pub struct CreateFormView {
    pub genres: Vec<&'static str>,
    pub form: MovieForm,
}

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<MovieView>>>> {
    let movies = state.movie_service.list(&user).await?;
    Ok(Json(ApiResponse::success(movies.into_iter().map(MovieView::from).collect())))
}

pub async fn details(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<MovieId>,
) -> ApiResult<Json<ApiResponse<MovieDetailsView>>> {
    let details = state.movie_service.details(&user, id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

pub async fn create_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<ApiResponse<CreateFormView>>> {
    let genres = state.movie_service.create_form(&user)?;
    Ok(Json(ApiResponse::success(CreateFormView {
        genres: genres.iter().map(Genre::as_str).collect(),
        form: MovieForm::default(),
    })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonForm(form): JsonForm<MovieForm>,
) -> ApiResult<(StatusCode, Located<MovieView>)> {
    let movie = state
        .movie_service
        .create(&user, &form)
        .await
        .map_err(|e| ApiError::from(e).with_input(&form))?;

    Ok((
        StatusCode::CREATED,
        ([(LOCATION, MOVIES_INDEX)], Json(ApiResponse::success(movie.into()))),
    ))
}

pub async fn edit_form(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<MovieId>,
) -> ApiResult<Json<ApiResponse<MovieView>>> {
    let movie = state.movie_service.edit_form(&user, id).await?;
    Ok(Json(ApiResponse::success(movie.into())))
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<MovieId>,
    JsonForm(form): JsonForm<MovieUpdateForm>,
) -> ApiResult<Located<MovieView>> {
    let movie = state
        .movie_service
        .update(&user, id, &form)
        .await
        .map_err(|e| ApiError::from(e).with_input(&form))?;

    Ok(([(LOCATION, MOVIES_INDEX)], Json(ApiResponse::success(movie.into()))))
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<MovieId>,
) -> ApiResult<Json<ApiResponse<DeleteConfirmView>>> {
    let movie = state.movie_service.delete_confirm(&user, id).await?;
    Ok(Json(ApiResponse::success(movie.into())))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<MovieId>,
) -> ApiResult<Located<DeletedView>> {
    state.movie_service.delete(&user, id).await?;
    Ok((
        [(LOCATION, MOVIES_INDEX)],
        Json(ApiResponse::success(DeletedView { id, deleted_at: Utc::now() })),
    ))
}

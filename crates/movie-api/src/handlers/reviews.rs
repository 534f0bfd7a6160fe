use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use movie_core::ReviewForm;
use movie_shared::MovieId;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AuthUser, JsonForm};
use crate::response::{ApiResponse, MovieDetailsView};
use crate::state::AppState;

/// Posts a review from the details page and returns the refreshed bundle.
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(movie_id): Path<MovieId>,
    JsonForm(form): JsonForm<ReviewForm>,
) -> ApiResult<(StatusCode, Json<ApiResponse<MovieDetailsView>>)> {
    let details = state
        .review_service
        .submit(&user, movie_id, &form)
        .await
        .map_err(|e| ApiError::from(e).with_input(&form))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(details.into()))))
}

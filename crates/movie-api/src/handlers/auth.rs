use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::warn;

use movie_core::services::{LoginResult, RegisterForm, UserInfo};
use movie_shared::utils::mask_email;

use crate::error::{ApiError, ApiResult};
use crate::extract::{AuthUser, JsonForm};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    JsonForm(form): JsonForm<RegisterForm>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    let user = state
        .auth_service
        .register(&form)
        .await
        .map_err(|e| ApiError::from(e).with_input(&form))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn login(
    State(state): State<AppState>,
    JsonForm(req): JsonForm<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResult>>> {
    let key = req.email.trim().to_lowercase();
    if state.login_limiter.check_key(&key).is_err() {
        warn!("Login throttled for {}", mask_email(&key));
        return Err(ApiError::TooManyRequests);
    }

    let result = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::success(result)))
}

/// Identity carried by the bearer token.
pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<movie_core::CurrentUser>> {
    Json(ApiResponse::success(user))
}

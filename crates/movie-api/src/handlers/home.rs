//! Informational pages with role-gated variants

use axum::{extract::State, Json};
use serde::Serialize;

use movie_core::{authorize, Policy};

use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PageInfo {
    pub title: String,
    pub message: String,
}

pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<PageInfo>> {
    Json(ApiResponse::success(PageInfo {
        title: state.app_name.clone(),
        message: "Browse movies and share your reviews.".to_string(),
    }))
}

pub async fn about(AuthUser(user): AuthUser) -> ApiResult<Json<ApiResponse<PageInfo>>> {
    authorize(&user, Policy::CustomersOnly)?;
    Ok(Json(ApiResponse::success(PageInfo {
        title: "About".to_string(),
        message: format!("Thanks for reviewing with us, {}.", user.name),
    })))
}

pub async fn contact(AuthUser(user): AuthUser) -> ApiResult<Json<ApiResponse<PageInfo>>> {
    authorize(&user, Policy::MembersOnly)?;
    Ok(Json(ApiResponse::success(PageInfo {
        title: "Contact".to_string(),
        message: "Members can reach the catalog team for listing changes.".to_string(),
    })))
}

pub async fn analytics() -> Json<ApiResponse<PageInfo>> {
    Json(ApiResponse::success(PageInfo {
        title: "Analytics".to_string(),
        message: "Ratings are averaged from every review a movie receives.".to_string(),
    }))
}

pub async fn privacy() -> Json<ApiResponse<PageInfo>> {
    Json(ApiResponse::success(PageInfo {
        title: "Privacy".to_string(),
        message: "Reviews show your display name. Email addresses are never published.".to_string(),
    }))
}

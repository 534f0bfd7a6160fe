//! Request extractors: bearer authentication and JSON form bodies

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use movie_core::CurrentUser;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller. Rejects with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let user = state.auth_service.authenticate(token)?;
        Ok(AuthUser(user))
    }
}

/// JSON body that fails like a form: a body that does not fit `T` becomes a
/// 422 carrying the submitted input instead of a plain-text rejection.
#[derive(Debug, Clone)]
pub struct JsonForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        serde_json::from_slice::<T>(&bytes)
            .map(JsonForm)
            .map_err(|e| unreadable_form(&e, &bytes))
    }
}

fn unreadable_form(err: &serde_json::Error, body: &[u8]) -> ApiError {
    let message = err.to_string();
    let field = missing_field(&message).unwrap_or("body").to_string();

    let input = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut map)) => {
            map.remove("password");
            Some(Value::Object(map))
        }
        Ok(other) => Some(other),
        Err(_) => None,
    };

    let mut fields = BTreeMap::new();
    fields.insert(field, vec![message]);
    ApiError::Validation {
        message: "The submitted form has errors".to_string(),
        fields,
        input,
    }
}

/// Field name from serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

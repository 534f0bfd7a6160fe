// ============================================================================
// Movie Core - Authentication Service
// File: crates/movie-core/src/services/auth_service.rs
// ============================================================================
//! Registration, login and bearer-token resolution

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use movie_security::{JwtService, PasswordService};
use movie_shared::utils::mask_email;

use crate::domain::{CurrentUser, Role, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Registration form. New accounts always start as customers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 100, message = "Display name must be between 2 and 100 characters"))]
    pub display_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password: String,
}

/// Authentication service for handling user login/register flows
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { user_repo, jwt }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let masked = mask_email(email);
        info!("Login attempt for email: {}", masked);

        // 1. Find user by email
        let user = match self.user_repo.find_by_email(&email.trim().to_lowercase()).await? {
            Some(user) => user,
            None => {
                PasswordService::verify_dummy(password);
                warn!("Login failed: email not found: {}", masked);
                return Err(DomainError::InvalidCredentials);
            }
        };

        // 2. Verify password
        let password_valid = PasswordService::verify(password, &user.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for: {}", masked);
            return Err(DomainError::InvalidCredentials);
        }

        // 3. Issue access token
        let access_token = self
            .jwt
            .generate_access_token(&user.id, &user.display_name, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!(user_id = %user.id, "Login successful for: {}", masked);

        Ok(LoginResult {
            user: UserInfo::from(&user),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry(),
        })
    }

    /// Register a new customer account
    pub async fn register(&self, form: &RegisterForm) -> Result<UserInfo, DomainError> {
        form.validate()?;
        PasswordService::check_policy(&form.password, &[form.email.as_str(), form.display_name.as_str()])?;

        let user = self
            .create_account(&form.display_name, &form.email, &form.password, Role::Customer)
            .await?;
        Ok(UserInfo::from(&user))
    }

    /// Creates an account with an explicit role. Uniqueness is enforced on
    /// email and display name; the password is stored as an Argon2 hash.
    pub async fn create_account(
        &self,
        display_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();
        let display_name = display_name.trim();
        info!("Registration attempt for email: {}", mask_email(&email));

        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", mask_email(&email));
            return Err(DomainError::EmailAlreadyExists(email));
        }

        if self.user_repo.find_by_display_name(display_name).await?.is_some() {
            warn!("Registration failed: display name already exists: {}", display_name);
            return Err(DomainError::DisplayNameAlreadyExists(display_name.to_string()));
        }

        let password_hash = PasswordService::hash(password)?;
        let user = User::new(display_name.to_string(), email, password_hash, role)?;
        let created = self.user_repo.create(&user).await?;

        info!(user_id = %created.id, role = %created.role, "Account created");
        Ok(created)
    }

    /// Resolves a bearer token to the caller's identity.
    pub fn authenticate(&self, token: &str) -> Result<CurrentUser, DomainError> {
        let claims = self
            .jwt
            .validate_token(token)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;
        let id = claims
            .user_id()
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;
        let role = Role::from_str(&claims.role)
            .ok_or_else(|| DomainError::InvalidToken(format!("unknown role: {}", claims.role)))?;

        Ok(CurrentUser { id, name: claims.name, role })
    }
}

/// Result of successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: UserInfo,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info returned in auth responses
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

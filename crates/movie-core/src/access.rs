// ============================================================================
// Movie Core - Access Control
// File: crates/movie-core/src/access.rs
// ============================================================================
//! Role policies checked at the start of every service operation.

use tracing::warn;

use crate::domain::{CurrentUser, Role};
use crate::error::DomainError;

/// Access policy attached to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Any signed-in user.
    Authenticated,
    MembersOnly,
    CustomersOnly,
}

impl Policy {
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Policy::Authenticated => None,
            Policy::MembersOnly => Some(Role::Member),
            Policy::CustomersOnly => Some(Role::Customer),
        }
    }
}

/// Rejects `user` unless it satisfies `policy`.
pub fn authorize(user: &CurrentUser, policy: Policy) -> Result<(), DomainError> {
    match policy.required_role() {
        Some(required) if !user.has_role(required) => {
            warn!(user_id = %user.id, role = %user.role, ?policy, "Access denied");
            Err(DomainError::Forbidden { required })
        }
        _ => Ok(()),
    }
}

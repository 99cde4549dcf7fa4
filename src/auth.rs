//! Bearer-token access control.
//!
//! # Purpose
//! Resolves the caller of each request from its `Authorization` header and
//! hands the result to privileged handlers as an explicit [`AdminPrincipal`]
//! argument. There is no session or global login state.
//!
//! # Rules
//! - No header, a non-Bearer scheme or an unknown token: 401.
//! - A known non-admin token on an admin route: 403.
use crate::api::error::{api_forbidden, api_unauthorized, ApiError};
use crate::app::AppState;
use crate::config::AccessTokens;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub role: Role,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credentials")]
    MissingCredentials,
    #[error("invalid bearer credentials")]
    InvalidCredentials,
}

#[derive(Debug, Default)]
pub struct AccessControl {
    entries: Vec<(Principal, String)>,
}

impl AccessControl {
    pub fn new(tokens: &AccessTokens) -> Self {
        let admins = tokens.admin.iter().map(|(subject, token)| {
            (
                Principal {
                    subject: subject.clone(),
                    role: Role::Admin,
                },
                token.clone(),
            )
        });
        let users = tokens.user.iter().map(|(subject, token)| {
            (
                Principal {
                    subject: subject.clone(),
                    role: Role::User,
                },
                token.clone(),
            )
        });
        Self {
            entries: admins.chain(users).collect(),
        }
    }

    pub fn has_admins(&self) -> bool {
        self.entries
            .iter()
            .any(|(principal, _)| principal.role == Role::Admin)
    }

    /// Resolve an `Authorization` header value to a principal.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Principal, AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;
        let (scheme, token) = header
            .trim()
            .split_once(' ')
            .ok_or(AuthError::InvalidCredentials)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::InvalidCredentials);
        }
        let token = token.trim();

        // Compare against every entry so timing does not reveal which one matched.
        let mut found = None;
        for (principal, expected) in &self.entries {
            if tokens_equal(token.as_bytes(), expected.as_bytes()) && found.is_none() {
                found = Some(principal);
            }
        }
        found.cloned().ok_or(AuthError::InvalidCredentials)
    }
}

fn tokens_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extractor for routes restricted to admin callers.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let principal = state
            .access
            .authenticate(header)
            .map_err(|err| api_unauthorized(&err.to_string()))?;
        if principal.role != Role::Admin {
            tracing::warn!(subject = %principal.subject, "non-admin caller on admin route");
            return Err(api_forbidden("admin privileges required"));
        }
        Ok(AdminPrincipal(principal))
    }
}

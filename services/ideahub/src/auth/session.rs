//! Session token minting and verification.
//!
//! # Purpose
//! Defines the claims carried by a signed session token and helpers for
//! resolving the calling user from request headers. Sessions are HS256 JWTs
//! signed with the configured session secret; they carry the user id, display
//! name, and role so handlers can evaluate RBAC without a store round-trip.
//!
//! # Security considerations
//! - Tokens are bearer credentials; the secret must stay server-side.
//! - Expiry is validated with zero leeway; an expired token is no session.
//! - A deleted account keeps a valid token until it expires; login refuses to
//!   mint new tokens for deleted accounts.
use crate::api::error::{api_unauthorized, ApiError};
use crate::app::AppState;
use crate::model::Role;
use axum::http::HeaderMap;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "ideahub_session";

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub name: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// The resolved caller of a request.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Signing material and lifetime for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Mint a session token for an authenticated user.
    pub fn issue(&self, user_id: &str, name: &str, role: Role) -> anyhow::Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify a session token and resolve the caller.
    pub fn verify(&self, token: &str) -> anyhow::Result<SessionUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)?;
        let role = Role::parse(&data.claims.role)
            .ok_or_else(|| anyhow::anyhow!("unknown role in session token"))?;
        Ok(SessionUser {
            id: data.claims.sub,
            name: data.claims.name,
            role,
        })
    }
}

/// Extract the raw session token from request headers.
///
/// `Authorization: Bearer` wins; the session cookie is the fallback for
/// browser clients.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = bearer_token(headers) {
        return Some(token);
    }
    cookie_token(headers)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?;
    let value = value.to_str().ok()?;
    value.strip_prefix("Bearer ")
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(axum::http::header::COOKIE)?;
    let value = value.to_str().ok()?;
    value
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
}

/// Resolve the calling user or fail with 401.
pub fn require_session(state: &AppState, headers: &HeaderMap) -> Result<SessionUser, ApiError> {
    let token = session_token(headers).ok_or_else(|| api_unauthorized("missing session"))?;
    state
        .sessions
        .verify(token)
        .map_err(|_| api_unauthorized("invalid session"))
}

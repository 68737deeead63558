//! Authentication middleware
//!
//! Tokens are issued by the external auth service; this middleware only
//! verifies them and exposes the caller's identity to handlers.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{constants::roles, error::AppError, state::AppState};

/// JWT claims as issued by the auth service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    /// Check for the admin role
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != roles::ADMIN {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Verify a bearer token against the configured secret
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            debug!(path = %path, "Auth failed: missing or malformed Authorization header");
            AppError::Unauthorized
        })?;

    let claims = verify_token(token, &state.config().jwt.secret).inspect_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: token verification failed");
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_for(role: &str, secret: &str, exp_offset_secs: i64) -> String {
        let claims = Claims {
            sub: "alice".to_string(),
            role: role.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_token_round_trip() {
        let token = token_for(roles::MEMBER, "secret", 3600);
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, roles::MEMBER);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let token = token_for(roles::MEMBER, "secret", 3600);
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_verify_token_expired() {
        let token = token_for(roles::MEMBER, "secret", -3600);
        let err = verify_token(&token, "secret").unwrap_err();
        assert_eq!(err.error_code(), "TOKEN_EXPIRED");
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthenticatedUser {
            username: "root".to_string(),
            role: roles::ADMIN.to_string(),
        };
        let member = AuthenticatedUser {
            username: "alice".to_string(),
            role: roles::MEMBER.to_string(),
        };
        assert!(admin.require_admin().is_ok());
        assert!(member.require_admin().is_err());
    }
}

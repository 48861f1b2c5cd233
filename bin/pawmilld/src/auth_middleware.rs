//! JWT authentication middleware.
//!
//! Extracts the bearer token from `Authorization: Bearer <token>`, validates
//! it, and injects the account id (the token subject) into request
//! extensions as `OwnerId`. Handlers receive it through the `OwnerId`
//! extractor; everything they read or write is scoped to it.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use pawmill_core::{error_code, OwnerId};

/// JWT claims payload. Issuance happens outside this server; only `sub`
/// (the account id) is consumed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account id.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Shared JWT configuration for the middleware.
#[derive(Clone)]
pub struct JwtState {
    pub decoding_key: DecodingKey,
    pub validation: Validation,
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let msg = match self {
            AuthError::MissingToken => "missing authorization token".to_string(),
            AuthError::InvalidToken(e) => format!("invalid token: {}", e),
        };
        let body = serde_json::json!({ "code": error_code::UNAUTHENTICATED, "message": msg });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Middleware that validates the JWT and injects the `OwnerId`.
///
/// Public paths pass through without a token (and without an `OwnerId`, so
/// any owner-scoped handler behind them would reject).
pub async fn auth_middleware(
    State(jwt_state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let path = request.uri().path().to_string();

    if is_public_path(&path) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let token_data =
        jsonwebtoken::decode::<Claims>(token, &jwt_state.decoding_key, &jwt_state.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    request
        .extensions_mut()
        .insert(OwnerId(token_data.claims.sub));

    Ok(next.run(request).await)
}

/// Paths reachable without authentication.
fn is_public_path(path: &str) -> bool {
    matches!(path, "/health" | "/version")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/version"));
        assert!(!is_public_path("/inventory/v1/ingredients"));
        assert!(!is_public_path("/"));
    }
}

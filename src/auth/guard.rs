//! Request guards for protected and admin-only routes.
//!
//! Both guards are axum extractors. `AdminOnly` is built on top of
//! `Authenticated`, so a role check can never be mounted on a route without
//! token verification running first.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use super::{AuthState, Claims, Role};

/// Guard rejection, serialized as `{"mensaje": …}` like every other error in
/// this API. Missing, invalid and expired tokens all map to 401 with messages
/// that do not reveal which check failed beyond token presence.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
    Forbidden,
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "No hay token en la petición"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Token no válido"),
            Self::Forbidden => (
                StatusCode::UNAUTHORIZED,
                "No tienes permisos para realizar esta acción",
            ),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Error en el servidor"),
        };
        (status, Json(json!({ "mensaje": message }))).into_response()
    }
}

/// Claims of a verified token. Extracting this guard is what makes a route
/// "protected": no valid bearer token, no handler.
#[derive(Debug)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(auth) = parts.extensions.get::<Arc<AuthState>>().cloned() else {
            error!("AuthState extension is missing; check router layering");
            return Err(AuthRejection::Internal);
        };

        let token = bearer_token(&parts.headers).ok_or(AuthRejection::MissingToken)?;

        match auth.signer().verify(&token) {
            Ok(claims) => Ok(Self(claims)),
            Err(err) => {
                // Expired vs. invalid stays observable here, the client only
                // sees a generic 401.
                debug!("token rejected: {err}");
                Err(AuthRejection::InvalidToken)
            }
        }
    }
}

/// `Authenticated` plus a role check: the claims must carry the
/// Administrador role.
#[derive(Debug)]
pub struct AdminOnly(pub Claims);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(claims))
    }
}

/// Pull the token out of the `Authorization` header. Clients historically
/// send the raw token; an RFC 6750 `Bearer ` prefix is accepted too.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed)
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

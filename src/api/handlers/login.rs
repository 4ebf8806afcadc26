//! Login: exchange `(email, password)` for a signed bearer token.

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::task;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{
    AuthState, Claims, RecordStatus, Role, password::verify_password, token::TokenSigner,
};

use super::{
    FieldError, message_response, normalize_email, server_error, valid_email, validation_failed,
};

const INVALID_CREDENTIALS: &str = "Credenciales inválidas";

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub uid: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "estado")]
    pub status: RecordStatus,
    pub token: String,
}

/// What the credential check needs from the store, nothing more.
pub(crate) struct CredentialRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: RecordStatus,
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; body carries the bearer token", body = LoginResponse),
        (status = 400, description = "Validation failure or invalid credentials"),
        (status = 500, description = "Unexpected store or signing failure")
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(auth): Extension<Arc<AuthState>>,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let (email, password) = match validate(&payload) {
        Ok(credentials) => credentials,
        Err(errors) => return validation_failed(errors),
    };

    let user = match find_credentials(&pool, &email).await {
        Ok(user) => user,
        Err(err) => {
            error!("Failed to look up credentials: {err}");
            return server_error();
        }
    };

    // bcrypt verification and token signing are CPU-bound; run them off the
    // async workers so concurrent requests are not stalled.
    let outcome = task::spawn_blocking(move || authenticate(user, &password, auth.signer())).await;

    match outcome {
        Ok(Ok(Some(response))) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Ok(None)) => message_response(StatusCode::BAD_REQUEST, INVALID_CREDENTIALS),
        Ok(Err(err)) => {
            error!("Failed to issue token: {err}");
            server_error()
        }
        Err(err) => {
            error!("Credential check task failed: {err}");
            server_error()
        }
    }
}

fn validate(payload: &LoginRequest) -> Result<(String, String), Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = payload
        .email
        .as_deref()
        .map(normalize_email)
        .unwrap_or_default();
    if !valid_email(&email) {
        errors.push(FieldError::new("email", "Email es requerido"));
    }

    let password = payload.password.clone().unwrap_or_default();
    if password.is_empty() {
        errors.push(FieldError::new("password", "Contraseña es requerida"));
    }

    if errors.is_empty() {
        Ok((email, password))
    } else {
        Err(errors)
    }
}

/// The credential decision itself, free of HTTP and database plumbing.
///
/// Unknown email and wrong password deliberately collapse into the same
/// `None` so the response cannot be used to enumerate accounts.
fn authenticate(
    user: Option<CredentialRow>,
    password: &str,
    signer: &TokenSigner,
) -> anyhow::Result<Option<LoginResponse>> {
    let Some(user) = user else {
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash) {
        return Ok(None);
    }

    let claims = Claims::new(
        user.id,
        user.name.clone(),
        user.email.clone(),
        user.role,
        user.status,
        Utc::now(),
    );
    let token = signer.issue(&claims)?;

    Ok(Some(LoginResponse {
        uid: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        status: user.status,
        token,
    }))
}

async fn find_credentials(pool: &PgPool, email: &str) -> anyhow::Result<Option<CredentialRow>> {
    let query = r"
        SELECT id, nombre, email, password_hash, rol, estado
        FROM usuarios
        WHERE email = $1
    ";
    let row = sqlx::query(query).bind(email).fetch_optional(pool).await?;
    row.map(|row| {
        let role_text: String = row.get("rol");
        let status_text: String = row.get("estado");
        Ok(CredentialRow {
            id: row.get("id"),
            name: row.get("nombre"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            role: Role::parse(&role_text)
                .ok_or_else(|| anyhow::anyhow!("unknown role stored for user: {role_text}"))?,
            status: RecordStatus::parse(&status_text).ok_or_else(|| {
                anyhow::anyhow!("unknown status stored for user: {status_text}")
            })?,
        })
    })
    .transpose()
}

//! User management endpoints. Admin-only throughout; users are created here
//! and only read back by the login flow.

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row, postgres::PgRow};
use tokio::task;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AdminOnly, RecordStatus, Role, password::hash_password};

use super::{
    FieldError, is_unique_violation, message_response, normalize_email, present, server_error,
    valid_email, validation_failed,
};

const USER_NOT_FOUND: &str = "Usuario no encontrado";
const EMAIL_EXISTS: &str = "Email ya existe";

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default, rename = "nombre")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "estado")]
    pub status: Option<String>,
    #[serde(default, rename = "rol")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default, rename = "nombre")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "estado")]
    pub status: Option<String>,
    #[serde(default, rename = "rol")]
    pub role: Option<String>,
}

/// User as returned to clients. The password hash never leaves the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub uid: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "estado")]
    pub status: RecordStatus,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, nombre, email, rol, estado, fecha_creacion, fecha_actualizacion";

fn user_from_row(row: &PgRow) -> anyhow::Result<UserResponse> {
    let role_text: String = row.get("rol");
    let status_text: String = row.get("estado");
    Ok(UserResponse {
        uid: row.get("id"),
        name: row.get("nombre"),
        email: row.get("email"),
        role: Role::parse(&role_text)
            .ok_or_else(|| anyhow::anyhow!("unknown role stored: {role_text}"))?,
        status: RecordStatus::parse(&status_text)
            .ok_or_else(|| anyhow::anyhow!("unknown status stored: {status_text}"))?,
        created_at: row.get("fecha_creacion"),
        updated_at: row.get("fecha_actualizacion"),
    })
}

#[utoipa::path(
    get,
    path = "/usuarios",
    responses(
        (status = 200, description = "All users, password hashes omitted", body = [UserResponse]),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "usuarios"
)]
pub async fn list(_admin: AdminOnly, Extension(pool): Extension<PgPool>) -> Response {
    let query = format!("SELECT {USER_COLUMNS} FROM usuarios ORDER BY fecha_creacion DESC");
    let rows = match sqlx::query(&query).fetch_all(&pool).await {
        Ok(rows) => rows,
        Err(err) => {
            error!("Failed to list users: {err}");
            return server_error();
        }
    };

    match rows.iter().map(user_from_row).collect::<Result<Vec<_>, _>>() {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => {
            error!("Bad user row: {err}");
            server_error()
        }
    }
}

#[utoipa::path(
    post,
    path = "/usuarios",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "usuarios"
)]
pub async fn create(
    _admin: AdminOnly,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateUserRequest>,
) -> Response {
    let fields = match validate_create(&payload) {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(errors),
    };

    // Hashing is CPU-bound; never run it on the async workers.
    let password = fields.password;
    let hash = match task::spawn_blocking(move || hash_password(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(err)) => {
            error!("Failed to hash password: {err}");
            return server_error();
        }
        Err(err) => {
            error!("Hashing task failed: {err}");
            return server_error();
        }
    };

    let query = format!(
        "INSERT INTO usuarios (nombre, email, password_hash, rol, estado)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&hash)
        .bind(fields.role.as_str())
        .bind(fields.status.as_str())
        .fetch_one(&pool)
        .await;

    match row {
        Ok(row) => match user_from_row(&row) {
            Ok(user) => (StatusCode::OK, Json(user)).into_response(),
            Err(err) => {
                error!("Bad user row: {err}");
                server_error()
            }
        },
        Err(err) if is_unique_violation(&err) => {
            message_response(StatusCode::BAD_REQUEST, EMAIL_EXISTS)
        }
        Err(err) => {
            error!("Failed to insert user: {err}");
            server_error()
        }
    }
}

#[utoipa::path(
    put,
    path = "/usuarios/{id}",
    request_body = UpdateUserRequest,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    ),
    tag = "usuarios"
)]
pub async fn update(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<UpdateUserRequest>,
) -> Response {
    let fields = match validate_update(&payload) {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(errors),
    };

    let query = format!(
        "UPDATE usuarios
         SET nombre = $1, email = $2, rol = $3, estado = $4, fecha_actualizacion = NOW()
         WHERE id = $5
         RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query(&query)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.role.as_str())
        .bind(fields.status.as_str())
        .bind(id)
        .fetch_optional(&pool)
        .await;

    match row {
        Ok(Some(row)) => match user_from_row(&row) {
            Ok(user) => (StatusCode::OK, Json(user)).into_response(),
            Err(err) => {
                error!("Bad user row: {err}");
                server_error()
            }
        },
        Ok(None) => message_response(StatusCode::NOT_FOUND, USER_NOT_FOUND),
        Err(err) if is_unique_violation(&err) => {
            message_response(StatusCode::BAD_REQUEST, EMAIL_EXISTS)
        }
        Err(err) => {
            error!("Failed to update user: {err}");
            server_error()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/usuarios/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    tag = "usuarios"
)]
pub async fn delete(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
) -> Response {
    match sqlx::query("DELETE FROM usuarios WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
    {
        Ok(result) if result.rows_affected() > 0 => {
            message_response(StatusCode::OK, "Usuario eliminado correctamente")
        }
        Ok(_) => message_response(StatusCode::NOT_FOUND, USER_NOT_FOUND),
        Err(err) => {
            error!("Failed to delete user: {err}");
            server_error()
        }
    }
}

#[derive(Debug)]
struct CreateFields {
    name: String,
    email: String,
    password: String,
    role: Role,
    status: RecordStatus,
}

struct UpdateFields {
    name: String,
    email: String,
    role: Role,
    status: RecordStatus,
}

fn validate_common(
    name: Option<&String>,
    email: Option<&String>,
    status: Option<&String>,
    role: Option<&String>,
    errors: &mut Vec<FieldError>,
) -> (Option<String>, Option<String>, Option<RecordStatus>, Option<Role>) {
    let name = present(name).map(str::to_string);
    if name.is_none() {
        errors.push(FieldError::new("nombre", "Nombre es requerido"));
    }

    let email = email.map(|email| normalize_email(email)).filter(|email| valid_email(email));
    if email.is_none() {
        errors.push(FieldError::new("email", "Email no es válido"));
    }

    let status = status.map(String::as_str).and_then(RecordStatus::parse);
    if status.is_none() {
        errors.push(FieldError::new("estado", "Estado no es válido"));
    }

    let role = role.map(String::as_str).and_then(Role::parse);
    if role.is_none() {
        errors.push(FieldError::new("rol", "Rol no es válido"));
    }

    (name, email, status, role)
}

fn validate_create(payload: &CreateUserRequest) -> Result<CreateFields, Vec<FieldError>> {
    let mut errors = Vec::new();
    let (name, email, status, role) = validate_common(
        payload.name.as_ref(),
        payload.email.as_ref(),
        payload.status.as_ref(),
        payload.role.as_ref(),
        &mut errors,
    );

    let password = present(payload.password.as_ref()).map(str::to_string);
    if password.is_none() {
        errors.push(FieldError::new("password", "Contraseña es requerida"));
    }

    match (name, email, password, status, role) {
        (Some(name), Some(email), Some(password), Some(status), Some(role))
            if errors.is_empty() =>
        {
            Ok(CreateFields {
                name,
                email,
                password,
                role,
                status,
            })
        }
        _ => Err(errors),
    }
}

fn validate_update(payload: &UpdateUserRequest) -> Result<UpdateFields, Vec<FieldError>> {
    let mut errors = Vec::new();
    let (name, email, status, role) = validate_common(
        payload.name.as_ref(),
        payload.email.as_ref(),
        payload.status.as_ref(),
        payload.role.as_ref(),
        &mut errors,
    );

    match (name, email, status, role) {
        (Some(name), Some(email), Some(status), Some(role)) if errors.is_empty() => {
            Ok(UpdateFields {
                name,
                email,
                role,
                status,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_every_field() {
        let payload = CreateUserRequest {
            name: None,
            email: None,
            password: None,
            status: None,
            role: None,
        };
        let errors = validate_create(&payload).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn create_rejects_unknown_role_and_status() {
        let payload = CreateUserRequest {
            name: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            password: Some("secret".to_string()),
            status: Some("Pendiente".to_string()),
            role: Some("SuperAdmin".to_string()),
        };
        let errors = validate_create(&payload).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, vec!["estado", "rol"]);
    }

    #[test]
    fn create_accepts_a_complete_payload() {
        let payload = CreateUserRequest {
            name: Some("Ana".to_string()),
            email: Some(" Ana@Example.com ".to_string()),
            password: Some("secret".to_string()),
            status: Some("Activo".to_string()),
            role: Some("Docente".to_string()),
        };
        let fields = validate_create(&payload).unwrap();
        assert_eq!(fields.email, "ana@example.com");
        assert_eq!(fields.role, Role::Teacher);
        assert_eq!(fields.status, RecordStatus::Active);
    }

    #[test]
    fn update_has_no_password_field() {
        let payload = UpdateUserRequest {
            name: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            status: Some("Inactivo".to_string()),
            role: Some("Administrador".to_string()),
        };
        let fields = validate_update(&payload).unwrap();
        assert_eq!(fields.role, Role::Admin);
        assert_eq!(fields.status, RecordStatus::Inactive);
    }

    #[test]
    fn user_response_never_carries_the_hash() {
        let user = UserResponse {
            uid: Uuid::nil(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Teacher,
            status: RecordStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["rol"], "Docente");
    }
}

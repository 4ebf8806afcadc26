//! Shared CRUD core for the lookup tables (brands, equipment types,
//! equipment statuses). The three resources are structurally identical:
//! a unique name, an Activo/Inactivo flag, and timestamps. Each public
//! handler module binds one [`Catalog`] to its routes and messages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::RecordStatus;

use super::{
    FieldError, is_unique_violation, message_response, present, server_error, validation_failed,
};

/// One lookup table plus its client-facing messages.
pub(crate) struct Catalog {
    pub table: &'static str,
    pub exists_message: &'static str,
    pub not_found_message: &'static str,
    pub deleted_message: &'static str,
}

pub(crate) const BRANDS: Catalog = Catalog {
    table: "marcas",
    exists_message: "La marca ya existe",
    not_found_message: "Marca no encontrada",
    deleted_message: "Marca eliminada correctamente",
};

pub(crate) const EQUIPMENT_TYPES: Catalog = Catalog {
    table: "tipos_equipo",
    exists_message: "El tipo de equipo ya existe",
    not_found_message: "Tipo de equipo no encontrado",
    deleted_message: "Tipo de equipo eliminado correctamente",
};

pub(crate) const EQUIPMENT_STATUSES: Catalog = Catalog {
    table: "estados_equipo",
    exists_message: "El estado de equipo ya existe",
    not_found_message: "Estado de equipo no encontrado",
    deleted_message: "Estado de equipo eliminado correctamente",
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CatalogRequest {
    #[serde(default, rename = "nombre")]
    pub name: Option<String>,
    #[serde(default, rename = "estado")]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub uid: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado")]
    pub status: RecordStatus,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

fn entry_from_row(row: &PgRow) -> anyhow::Result<CatalogEntry> {
    let status_text: String = row.get("estado");
    Ok(CatalogEntry {
        uid: row.get("id"),
        name: row.get("nombre"),
        status: RecordStatus::parse(&status_text)
            .ok_or_else(|| anyhow::anyhow!("unknown status stored: {status_text}"))?,
        created_at: row.get("fecha_creacion"),
        updated_at: row.get("fecha_actualizacion"),
    })
}

fn validate(payload: &CatalogRequest) -> Result<(String, RecordStatus), Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = present(payload.name.as_ref()).map(str::to_string);
    if name.is_none() {
        errors.push(FieldError::new("nombre", "Nombre es requerido"));
    }

    let status = payload
        .status
        .as_deref()
        .and_then(RecordStatus::parse);
    if status.is_none() {
        errors.push(FieldError::new("estado", "Estado no es válido"));
    }

    match (name, status) {
        (Some(name), Some(status)) if errors.is_empty() => Ok((name, status)),
        _ => Err(errors),
    }
}

impl Catalog {
    pub(crate) async fn list(&self, pool: &PgPool) -> Response {
        let query = format!(
            "SELECT id, nombre, estado, fecha_creacion, fecha_actualizacion
             FROM {} ORDER BY fecha_creacion DESC",
            self.table
        );
        let rows = match sqlx::query(&query).fetch_all(pool).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("Failed to list {}: {err}", self.table);
                return server_error();
            }
        };

        match rows.iter().map(entry_from_row).collect::<Result<Vec<_>, _>>() {
            Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
            Err(err) => {
                error!("Bad row in {}: {err}", self.table);
                server_error()
            }
        }
    }

    pub(crate) async fn create(&self, pool: &PgPool, payload: CatalogRequest) -> Response {
        let (name, status) = match validate(&payload) {
            Ok(fields) => fields,
            Err(errors) => return validation_failed(errors),
        };

        let query = format!(
            "INSERT INTO {} (nombre, estado)
             VALUES ($1, $2)
             RETURNING id, nombre, estado, fecha_creacion, fecha_actualizacion",
            self.table
        );
        let row = sqlx::query(&query)
            .bind(&name)
            .bind(status.as_str())
            .fetch_one(pool)
            .await;

        match row {
            Ok(row) => match entry_from_row(&row) {
                Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
                Err(err) => {
                    error!("Bad row in {}: {err}", self.table);
                    server_error()
                }
            },
            // The unique index is the source of truth for duplicates.
            Err(err) if is_unique_violation(&err) => {
                message_response(StatusCode::BAD_REQUEST, self.exists_message)
            }
            Err(err) => {
                error!("Failed to insert into {}: {err}", self.table);
                server_error()
            }
        }
    }

    pub(crate) async fn update(&self, pool: &PgPool, id: Uuid, payload: CatalogRequest) -> Response {
        let (name, status) = match validate(&payload) {
            Ok(fields) => fields,
            Err(errors) => return validation_failed(errors),
        };

        let query = format!(
            "UPDATE {} SET nombre = $1, estado = $2, fecha_actualizacion = NOW()
             WHERE id = $3
             RETURNING id, nombre, estado, fecha_creacion, fecha_actualizacion",
            self.table
        );
        let row = sqlx::query(&query)
            .bind(&name)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await;

        match row {
            Ok(Some(row)) => match entry_from_row(&row) {
                Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
                Err(err) => {
                    error!("Bad row in {}: {err}", self.table);
                    server_error()
                }
            },
            Ok(None) => message_response(StatusCode::NOT_FOUND, self.not_found_message),
            Err(err) if is_unique_violation(&err) => {
                message_response(StatusCode::BAD_REQUEST, self.exists_message)
            }
            Err(err) => {
                error!("Failed to update {}: {err}", self.table);
                server_error()
            }
        }
    }

    pub(crate) async fn delete(&self, pool: &PgPool, id: Uuid) -> Response {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table);
        match sqlx::query(&query).bind(id).execute(pool).await {
            Ok(result) if result.rows_affected() > 0 => {
                message_response(StatusCode::OK, self.deleted_message)
            }
            Ok(_) => message_response(StatusCode::NOT_FOUND, self.not_found_message),
            Err(err) => {
                error!("Failed to delete from {}: {err}", self.table);
                server_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_name_and_known_status() {
        let payload = CatalogRequest {
            name: None,
            status: Some("Roto".to_string()),
        };
        let errors = validate(&payload).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, vec!["nombre", "estado"]);
    }

    #[test]
    fn validate_trims_the_name() {
        let payload = CatalogRequest {
            name: Some("  Lenovo  ".to_string()),
            status: Some("Activo".to_string()),
        };
        let (name, status) = validate(&payload).unwrap();
        assert_eq!(name, "Lenovo");
        assert_eq!(status, RecordStatus::Active);
    }

    #[test]
    fn catalog_entries_serialize_with_wire_names() {
        let entry = CatalogEntry {
            uid: Uuid::nil(),
            name: "HP".to_string(),
            status: RecordStatus::Inactive,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["nombre"], "HP");
        assert_eq!(value["estado"], "Inactivo");
        assert!(value.get("fechaCreacion").is_some());
    }
}

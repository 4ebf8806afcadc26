//! Equipment inventory endpoints. Reading the list only requires a valid
//! token; mutations are admin-only.

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AdminOnly, Authenticated, RecordStatus};

use super::{
    FieldError, is_unique_violation, message_response, present, server_error, validation_failed,
};

const ITEM_NOT_FOUND: &str = "Inventario no encontrado";
const SERIAL_EXISTS: &str = "El serial ya existe";

#[derive(Debug, Deserialize, ToSchema)]
pub struct InventoryRequest {
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default, rename = "modelo")]
    pub model: Option<String>,
    #[serde(default, rename = "descripcion")]
    pub description: Option<String>,
    #[serde(default, rename = "fotoEquipo")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, rename = "fechaCompra")]
    pub purchased_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "precioCompra")]
    pub purchase_price: Option<f64>,
    #[serde(default, rename = "usuario")]
    pub user_id: Option<Uuid>,
    #[serde(default, rename = "marca")]
    pub brand_id: Option<Uuid>,
    #[serde(default, rename = "tipoEquipo")]
    pub type_id: Option<Uuid>,
    #[serde(default, rename = "estadoEquipo")]
    pub status_id: Option<Uuid>,
}

/// Flat item as returned by create/update: references stay as ids.
#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryDetail {
    pub uid: Uuid,
    pub serial: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fotoEquipo")]
    pub photo_url: String,
    pub color: String,
    #[serde(rename = "fechaCompra")]
    pub purchased_at: DateTime<Utc>,
    #[serde(rename = "precioCompra")]
    pub purchase_price: f64,
    #[serde(rename = "usuario")]
    pub user_id: Uuid,
    #[serde(rename = "marca")]
    pub brand_id: Uuid,
    #[serde(rename = "tipoEquipo")]
    pub type_id: Uuid,
    #[serde(rename = "estadoEquipo")]
    pub status_id: Uuid,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

/// Assigned user as embedded in the inventory listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserRef {
    pub uid: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "estado")]
    pub status: RecordStatus,
}

/// Catalog reference as embedded in the inventory listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogRef {
    pub uid: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "estado")]
    pub status: RecordStatus,
}

/// Item as returned by the listing: references resolved to their records.
#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryView {
    pub uid: Uuid,
    pub serial: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fotoEquipo")]
    pub photo_url: String,
    pub color: String,
    #[serde(rename = "fechaCompra")]
    pub purchased_at: DateTime<Utc>,
    #[serde(rename = "precioCompra")]
    pub purchase_price: f64,
    #[serde(rename = "usuario")]
    pub user: UserRef,
    #[serde(rename = "marca")]
    pub brand: CatalogRef,
    #[serde(rename = "tipoEquipo")]
    pub equipment_type: CatalogRef,
    #[serde(rename = "estadoEquipo")]
    pub equipment_status: CatalogRef,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

const ITEM_COLUMNS: &str = "id, serial, modelo, descripcion, foto_equipo, color, fecha_compra, \
     precio_compra, usuario_id, marca_id, tipo_equipo_id, estado_equipo_id, \
     fecha_creacion, fecha_actualizacion";

fn status_field(row: &PgRow, column: &str) -> anyhow::Result<RecordStatus> {
    let text: String = row.get(column);
    RecordStatus::parse(&text).ok_or_else(|| anyhow::anyhow!("unknown status stored: {text}"))
}

fn detail_from_row(row: &PgRow) -> InventoryDetail {
    InventoryDetail {
        uid: row.get("id"),
        serial: row.get("serial"),
        model: row.get("modelo"),
        description: row.get("descripcion"),
        photo_url: row.get("foto_equipo"),
        color: row.get("color"),
        purchased_at: row.get("fecha_compra"),
        purchase_price: row.get("precio_compra"),
        user_id: row.get("usuario_id"),
        brand_id: row.get("marca_id"),
        type_id: row.get("tipo_equipo_id"),
        status_id: row.get("estado_equipo_id"),
        created_at: row.get("fecha_creacion"),
        updated_at: row.get("fecha_actualizacion"),
    }
}

fn view_from_row(row: &PgRow) -> anyhow::Result<InventoryView> {
    Ok(InventoryView {
        uid: row.get("id"),
        serial: row.get("serial"),
        model: row.get("modelo"),
        description: row.get("descripcion"),
        photo_url: row.get("foto_equipo"),
        color: row.get("color"),
        purchased_at: row.get("fecha_compra"),
        purchase_price: row.get("precio_compra"),
        user: UserRef {
            uid: row.get("usuario_id"),
            name: row.get("usuario_nombre"),
            email: row.get("usuario_email"),
            status: status_field(row, "usuario_estado")?,
        },
        brand: CatalogRef {
            uid: row.get("marca_id"),
            name: row.get("marca_nombre"),
            status: status_field(row, "marca_estado")?,
        },
        equipment_type: CatalogRef {
            uid: row.get("tipo_equipo_id"),
            name: row.get("tipo_equipo_nombre"),
            status: status_field(row, "tipo_equipo_estado")?,
        },
        equipment_status: CatalogRef {
            uid: row.get("estado_equipo_id"),
            name: row.get("estado_equipo_nombre"),
            status: status_field(row, "estado_equipo_estado")?,
        },
        created_at: row.get("fecha_creacion"),
        updated_at: row.get("fecha_actualizacion"),
    })
}

#[utoipa::path(
    get,
    path = "/inventarios",
    responses(
        (status = 200, description = "All inventory items with resolved references", body = [InventoryView]),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "inventarios"
)]
pub async fn list(_auth: Authenticated, Extension(pool): Extension<PgPool>) -> Response {
    let query = r"
        SELECT
            i.id, i.serial, i.modelo, i.descripcion, i.foto_equipo, i.color,
            i.fecha_compra, i.precio_compra, i.fecha_creacion, i.fecha_actualizacion,
            i.usuario_id, u.nombre AS usuario_nombre, u.email AS usuario_email,
            u.estado AS usuario_estado,
            i.marca_id, m.nombre AS marca_nombre, m.estado AS marca_estado,
            i.tipo_equipo_id, t.nombre AS tipo_equipo_nombre, t.estado AS tipo_equipo_estado,
            i.estado_equipo_id, e.nombre AS estado_equipo_nombre, e.estado AS estado_equipo_estado
        FROM inventarios i
        JOIN usuarios u ON u.id = i.usuario_id
        JOIN marcas m ON m.id = i.marca_id
        JOIN tipos_equipo t ON t.id = i.tipo_equipo_id
        JOIN estados_equipo e ON e.id = i.estado_equipo_id
        ORDER BY i.fecha_creacion DESC
    ";
    let rows = match sqlx::query(query).fetch_all(&pool).await {
        Ok(rows) => rows,
        Err(err) => {
            error!("Failed to list inventory: {err}");
            return server_error();
        }
    };

    match rows.iter().map(view_from_row).collect::<Result<Vec<_>, _>>() {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => {
            error!("Bad inventory row: {err}");
            server_error()
        }
    }
}

#[utoipa::path(
    post,
    path = "/inventarios",
    request_body = InventoryRequest,
    responses(
        (status = 200, description = "Item created", body = InventoryDetail),
        (status = 400, description = "Validation failure or duplicate serial"),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "inventarios"
)]
pub async fn create(
    _admin: AdminOnly,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<InventoryRequest>,
) -> Response {
    let fields = match validate(&payload) {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(errors),
    };

    let query = format!(
        "INSERT INTO inventarios
             (serial, modelo, descripcion, foto_equipo, color, fecha_compra,
              precio_compra, usuario_id, marca_id, tipo_equipo_id, estado_equipo_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING {ITEM_COLUMNS}"
    );
    let row = bind_fields(sqlx::query(&query), &fields).fetch_one(&pool).await;

    match row {
        Ok(row) => (StatusCode::OK, Json(detail_from_row(&row))).into_response(),
        Err(err) if is_unique_violation(&err) => {
            message_response(StatusCode::BAD_REQUEST, SERIAL_EXISTS)
        }
        Err(err) => {
            error!("Failed to insert inventory item: {err}");
            server_error()
        }
    }
}

#[utoipa::path(
    put,
    path = "/inventarios/{id}",
    request_body = InventoryRequest,
    params(("id" = Uuid, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Item updated", body = InventoryDetail),
        (status = 404, description = "Item not found")
    ),
    tag = "inventarios"
)]
pub async fn update(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<InventoryRequest>,
) -> Response {
    let fields = match validate(&payload) {
        Ok(fields) => fields,
        Err(errors) => return validation_failed(errors),
    };

    let query = format!(
        "UPDATE inventarios
         SET serial = $1, modelo = $2, descripcion = $3, foto_equipo = $4, color = $5,
             fecha_compra = $6, precio_compra = $7, usuario_id = $8, marca_id = $9,
             tipo_equipo_id = $10, estado_equipo_id = $11, fecha_actualizacion = NOW()
         WHERE id = $12
         RETURNING {ITEM_COLUMNS}"
    );
    let row = bind_fields(sqlx::query(&query), &fields)
        .bind(id)
        .fetch_optional(&pool)
        .await;

    match row {
        Ok(Some(row)) => (StatusCode::OK, Json(detail_from_row(&row))).into_response(),
        Ok(None) => message_response(StatusCode::NOT_FOUND, ITEM_NOT_FOUND),
        Err(err) if is_unique_violation(&err) => {
            message_response(StatusCode::BAD_REQUEST, SERIAL_EXISTS)
        }
        Err(err) => {
            error!("Failed to update inventory item: {err}");
            server_error()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/inventarios/{id}",
    params(("id" = Uuid, Path, description = "Inventory item id")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found")
    ),
    tag = "inventarios"
)]
pub async fn delete(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
) -> Response {
    match sqlx::query("DELETE FROM inventarios WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
    {
        Ok(result) if result.rows_affected() > 0 => {
            message_response(StatusCode::OK, "Inventario eliminado correctamente")
        }
        Ok(_) => message_response(StatusCode::NOT_FOUND, ITEM_NOT_FOUND),
        Err(err) => {
            error!("Failed to delete inventory item: {err}");
            server_error()
        }
    }
}

#[derive(Debug)]
struct ItemFields {
    serial: String,
    model: String,
    description: String,
    photo_url: String,
    color: String,
    purchased_at: DateTime<Utc>,
    purchase_price: f64,
    user_id: Uuid,
    brand_id: Uuid,
    type_id: Uuid,
    status_id: Uuid,
}

type PgQuery<'q> =
    sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn bind_fields<'q>(query: PgQuery<'q>, fields: &'q ItemFields) -> PgQuery<'q> {
    query
        .bind(&fields.serial)
        .bind(&fields.model)
        .bind(&fields.description)
        .bind(&fields.photo_url)
        .bind(&fields.color)
        .bind(fields.purchased_at)
        .bind(fields.purchase_price)
        .bind(fields.user_id)
        .bind(fields.brand_id)
        .bind(fields.type_id)
        .bind(fields.status_id)
}

fn validate(payload: &InventoryRequest) -> Result<ItemFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let mut text = |value: Option<&String>, field: &'static str, message: &'static str| {
        let value = present(value).map(str::to_string);
        if value.is_none() {
            errors.push(FieldError::new(field, message));
        }
        value
    };

    let serial = text(payload.serial.as_ref(), "serial", "Serial es requerido");
    let model = text(payload.model.as_ref(), "modelo", "Modelo es requerido");
    let description = text(
        payload.description.as_ref(),
        "descripcion",
        "Descripción es requerida",
    );
    let photo_url = text(
        payload.photo_url.as_ref(),
        "fotoEquipo",
        "Foto de equipo es requerida",
    );
    let color = text(payload.color.as_ref(), "color", "Color es requerido");

    if payload.purchased_at.is_none() {
        errors.push(FieldError::new("fechaCompra", "Fecha de compra es requerida"));
    }
    if payload.purchase_price.is_none() {
        errors.push(FieldError::new(
            "precioCompra",
            "Precio de compra es requerido",
        ));
    }
    if payload.user_id.is_none() {
        errors.push(FieldError::new("usuario", "Usuario es requerido"));
    }
    if payload.brand_id.is_none() {
        errors.push(FieldError::new("marca", "Marca es requerida"));
    }
    if payload.type_id.is_none() {
        errors.push(FieldError::new("tipoEquipo", "Tipo de equipo es requerido"));
    }
    if payload.status_id.is_none() {
        errors.push(FieldError::new(
            "estadoEquipo",
            "Estado de equipo es requerido",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // All presence checks passed above.
    Ok(ItemFields {
        serial: serial.unwrap(),
        model: model.unwrap(),
        description: description.unwrap(),
        photo_url: photo_url.unwrap(),
        color: color.unwrap(),
        purchased_at: payload.purchased_at.unwrap(),
        purchase_price: payload.purchase_price.unwrap(),
        user_id: payload.user_id.unwrap(),
        brand_id: payload.brand_id.unwrap(),
        type_id: payload.type_id.unwrap(),
        status_id: payload.status_id.unwrap(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> InventoryRequest {
        InventoryRequest {
            serial: Some("SN-001".to_string()),
            model: Some("ThinkPad T14".to_string()),
            description: Some("Equipo de cómputo portátil".to_string()),
            photo_url: Some("https://example.com/foto.png".to_string()),
            color: Some("Negro".to_string()),
            purchased_at: Some(Utc::now()),
            purchase_price: Some(1500.0),
            user_id: Some(Uuid::new_v4()),
            brand_id: Some(Uuid::new_v4()),
            type_id: Some(Uuid::new_v4()),
            status_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn validate_accepts_a_complete_payload() {
        let fields = validate(&full_payload()).unwrap();
        assert_eq!(fields.serial, "SN-001");
        assert_eq!(fields.color, "Negro");
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let payload = InventoryRequest {
            serial: None,
            model: None,
            description: None,
            photo_url: None,
            color: None,
            purchased_at: None,
            purchase_price: None,
            user_id: None,
            brand_id: None,
            type_id: None,
            status_id: None,
        };
        let errors = validate(&payload).unwrap_err();
        assert_eq!(errors.len(), 11);
    }

    #[test]
    fn validate_rejects_blank_strings() {
        let mut payload = full_payload();
        payload.serial = Some("   ".to_string());
        let errors = validate(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "serial");
    }

    #[test]
    fn views_serialize_with_nested_references() {
        let view = InventoryView {
            uid: Uuid::nil(),
            serial: "SN-001".to_string(),
            model: "ThinkPad".to_string(),
            description: "Portátil".to_string(),
            photo_url: "https://example.com/foto.png".to_string(),
            color: "Negro".to_string(),
            purchased_at: Utc::now(),
            purchase_price: 1500.0,
            user: UserRef {
                uid: Uuid::nil(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                status: RecordStatus::Active,
            },
            brand: CatalogRef {
                uid: Uuid::nil(),
                name: "Lenovo".to_string(),
                status: RecordStatus::Active,
            },
            equipment_type: CatalogRef {
                uid: Uuid::nil(),
                name: "Portátil".to_string(),
                status: RecordStatus::Active,
            },
            equipment_status: CatalogRef {
                uid: Uuid::nil(),
                name: "En uso".to_string(),
                status: RecordStatus::Active,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["usuario"]["nombre"], "Ana");
        assert_eq!(value["marca"]["nombre"], "Lenovo");
        assert_eq!(value["tipoEquipo"]["estado"], "Activo");
        assert_eq!(value["fotoEquipo"], "https://example.com/foto.png");
    }
}

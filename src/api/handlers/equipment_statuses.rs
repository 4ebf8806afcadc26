//! Equipment status catalog endpoints (the per-device condition, not the
//! Activo/Inactivo record flag).

use axum::{extract::{Extension, Path}, response::Response, Json};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AdminOnly;

use super::catalog::{CatalogEntry, CatalogRequest, EQUIPMENT_STATUSES};

#[utoipa::path(
    get,
    path = "/estados-equipo",
    responses(
        (status = 200, description = "All equipment statuses", body = [CatalogEntry]),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "catalogos"
)]
pub async fn list(_admin: AdminOnly, Extension(pool): Extension<PgPool>) -> Response {
    EQUIPMENT_STATUSES.list(&pool).await
}

#[utoipa::path(
    post,
    path = "/estados-equipo",
    request_body = CatalogRequest,
    responses(
        (status = 200, description = "Equipment status created", body = CatalogEntry),
        (status = 400, description = "Validation failure or duplicate name")
    ),
    tag = "catalogos"
)]
pub async fn create(
    _admin: AdminOnly,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CatalogRequest>,
) -> Response {
    EQUIPMENT_STATUSES.create(&pool, payload).await
}

#[utoipa::path(
    put,
    path = "/estados-equipo/{id}",
    request_body = CatalogRequest,
    params(("id" = Uuid, Path, description = "Equipment status id")),
    responses(
        (status = 200, description = "Equipment status updated", body = CatalogEntry),
        (status = 404, description = "Equipment status not found")
    ),
    tag = "catalogos"
)]
pub async fn update(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CatalogRequest>,
) -> Response {
    EQUIPMENT_STATUSES.update(&pool, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/estados-equipo/{id}",
    params(("id" = Uuid, Path, description = "Equipment status id")),
    responses(
        (status = 200, description = "Equipment status deleted"),
        (status = 404, description = "Equipment status not found")
    ),
    tag = "catalogos"
)]
pub async fn delete(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
) -> Response {
    EQUIPMENT_STATUSES.delete(&pool, id).await
}

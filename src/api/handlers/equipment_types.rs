//! Equipment type catalog endpoints.

use axum::{extract::{Extension, Path}, response::Response, Json};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AdminOnly;

use super::catalog::{CatalogEntry, CatalogRequest, EQUIPMENT_TYPES};

#[utoipa::path(
    get,
    path = "/tipos-equipo",
    responses(
        (status = 200, description = "All equipment types", body = [CatalogEntry]),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "catalogos"
)]
pub async fn list(_admin: AdminOnly, Extension(pool): Extension<PgPool>) -> Response {
    EQUIPMENT_TYPES.list(&pool).await
}

#[utoipa::path(
    post,
    path = "/tipos-equipo",
    request_body = CatalogRequest,
    responses(
        (status = 200, description = "Equipment type created", body = CatalogEntry),
        (status = 400, description = "Validation failure or duplicate name")
    ),
    tag = "catalogos"
)]
pub async fn create(
    _admin: AdminOnly,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CatalogRequest>,
) -> Response {
    EQUIPMENT_TYPES.create(&pool, payload).await
}

#[utoipa::path(
    put,
    path = "/tipos-equipo/{id}",
    request_body = CatalogRequest,
    params(("id" = Uuid, Path, description = "Equipment type id")),
    responses(
        (status = 200, description = "Equipment type updated", body = CatalogEntry),
        (status = 404, description = "Equipment type not found")
    ),
    tag = "catalogos"
)]
pub async fn update(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CatalogRequest>,
) -> Response {
    EQUIPMENT_TYPES.update(&pool, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/tipos-equipo/{id}",
    params(("id" = Uuid, Path, description = "Equipment type id")),
    responses(
        (status = 200, description = "Equipment type deleted"),
        (status = 404, description = "Equipment type not found")
    ),
    tag = "catalogos"
)]
pub async fn delete(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
) -> Response {
    EQUIPMENT_TYPES.delete(&pool, id).await
}

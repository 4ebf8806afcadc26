//! Brand catalog endpoints. Admin-only, like all catalog maintenance.

use axum::{extract::{Extension, Path}, response::Response, Json};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AdminOnly;

use super::catalog::{BRANDS, CatalogEntry, CatalogRequest};

#[utoipa::path(
    get,
    path = "/marcas",
    responses(
        (status = 200, description = "All brands", body = [CatalogEntry]),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "catalogos"
)]
pub async fn list(_admin: AdminOnly, Extension(pool): Extension<PgPool>) -> Response {
    BRANDS.list(&pool).await
}

#[utoipa::path(
    post,
    path = "/marcas",
    request_body = CatalogRequest,
    responses(
        (status = 200, description = "Brand created", body = CatalogEntry),
        (status = 400, description = "Validation failure or duplicate name"),
        (status = 401, description = "Missing/invalid token or insufficient role")
    ),
    tag = "catalogos"
)]
pub async fn create(
    _admin: AdminOnly,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CatalogRequest>,
) -> Response {
    BRANDS.create(&pool, payload).await
}

#[utoipa::path(
    put,
    path = "/marcas/{id}",
    request_body = CatalogRequest,
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand updated", body = CatalogEntry),
        (status = 404, description = "Brand not found")
    ),
    tag = "catalogos"
)]
pub async fn update(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CatalogRequest>,
) -> Response {
    BRANDS.update(&pool, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/marcas/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 404, description = "Brand not found")
    ),
    tag = "catalogos"
)]
pub async fn delete(
    _admin: AdminOnly,
    Path(id): Path<Uuid>,
    Extension(pool): Extension<PgPool>,
) -> Response {
    BRANDS.delete(&pool, id).await
}

use super::handlers::{brands, equipment_statuses, equipment_types, health, inventory, login, users};
use utoipa::openapi::{InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(login::login))
        .routes(routes!(users::list, users::create))
        .routes(routes!(users::update, users::delete))
        .routes(routes!(brands::list, brands::create))
        .routes(routes!(brands::update, brands::delete))
        .routes(routes!(equipment_types::list, equipment_types::create))
        .routes(routes!(equipment_types::update, equipment_types::delete))
        .routes(routes!(equipment_statuses::list, equipment_statuses::create))
        .routes(routes!(equipment_statuses::update, equipment_statuses::delete))
        .routes(routes!(inventory::list, inventory::create))
        .routes(routes!(inventory::update, inventory::delete));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Login and token issuance".to_string());

    let mut users_tag = Tag::new("usuarios");
    users_tag.description = Some("User management (admin only)".to_string());

    let mut catalog_tag = Tag::new("catalogos");
    catalog_tag.description =
        Some("Brands, equipment types and equipment statuses (admin only)".to_string());

    let mut inventory_tag = Tag::new("inventarios");
    inventory_tag.description = Some("Equipment inventory".to_string());

    router.get_openapi_mut().tags = Some(vec![auth_tag, users_tag, catalog_tag, inventory_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_every_resource() {
        let doc = openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/health",
            "/login",
            "/usuarios",
            "/usuarios/{id}",
            "/marcas",
            "/marcas/{id}",
            "/tipos-equipo",
            "/tipos-equipo/{id}",
            "/estados-equipo",
            "/estados-equipo/{id}",
            "/inventarios",
            "/inventarios/{id}",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn openapi_info_comes_from_cargo_metadata() {
        let doc = openapi();
        assert_eq!(doc.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));
    }
}

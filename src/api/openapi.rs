use super::handlers::{auth, health, me};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both
/// served and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(me::me))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::login::dev_users))
        .routes(routes!(auth::login::logout))
        .routes(routes!(auth::oauth::google_start))
        .routes(routes!(auth::oauth::google_callback));

    let mut gateway_tag = Tag::new("gateway");
    gateway_tag.description = Some("Reading club API gateway".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Session login, logout, and Google OAuth".to_string());

    router.get_openapi_mut().tags = Some(vec![gateway_tag, auth_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    OpenApiBuilder::new().info(info).build()
}

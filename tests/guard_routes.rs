//! Router-level tests for the request guards.
//!
//! Guards run before any database extractor, so every rejection path here is
//! exercised through the real router without a Postgres instance behind it.

use axum::{
    Extension, Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use inventario::auth::{AuthState, Claims, RecordStatus, Role, claims::TOKEN_TTL_HOURS};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn auth_state(secret: &str) -> Arc<AuthState> {
    Arc::new(AuthState::new(&SecretString::from(secret.to_string())))
}

fn app(state: Arc<AuthState>) -> Router {
    let (router, _openapi) = inventario::api::router().split_for_parts();
    router.layer(Extension(state))
}

fn token(state: &AuthState, role: Role, issued_at: DateTime<Utc>) -> String {
    let claims = Claims::new(
        Uuid::new_v4(),
        "Prueba".to_string(),
        "prueba@example.com".to_string(),
        role,
        RecordStatus::Active,
        issued_at,
    );
    state.signer().issue(&claims).unwrap()
}

async fn get(app: Router, uri: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, token);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn message(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    value["mensaje"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn admin_route_without_header_is_unauthorized() {
    let state = auth_state("it-secret");
    let response = get(app(state), "/usuarios", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(response).await, "No hay token en la petición");
}

#[tokio::test]
async fn admin_route_rejects_docente_token() {
    let state = auth_state("it-secret");
    let token = token(&state, Role::Teacher, Utc::now());
    let response = get(app(state), "/usuarios", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        message(response).await,
        "No tienes permisos para realizar esta acción"
    );
}

#[tokio::test]
async fn protected_route_rejects_garbage_token() {
    let state = auth_state("it-secret");
    let response = get(app(state), "/inventarios", Some("garbage")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(response).await, "Token no válido");
}

#[tokio::test]
async fn admin_route_rejects_expired_token() {
    let state = auth_state("it-secret");
    let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);
    let token = token(&state, Role::Admin, issued);
    let response = get(app(state), "/marcas", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(response).await, "Token no válido");
}

#[tokio::test]
async fn admin_route_rejects_token_from_another_secret() {
    let foreign = auth_state("someone-elses-secret");
    let token = token(&foreign, Role::Admin, Utc::now());
    let response = get(app(auth_state("it-secret")), "/tipos-equipo", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(response).await, "Token no válido");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let state = auth_state("it-secret");
    let response = get(app(state), "/no-such-route", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

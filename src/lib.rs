//! # Inventario
//!
//! Equipment inventory management backend: users, brands, equipment types,
//! equipment statuses and the inventory itself, all behind a stateless JWT
//! login.
//!
//! ## Authentication
//!
//! `POST /login` exchanges `(email, password)` for a signed bearer token
//! (HS256, 100 hour TTL). Every other route requires the token in the
//! `Authorization` header; catalog and user maintenance additionally require
//! the `Administrador` role. Guards are extractors, so a role-gated route
//! always verifies the token first.
//!
//! ## Conventions
//!
//! The wire contract keeps the Spanish field names and enum values the API
//! has always spoken (`nombre`, `estado`, `mensaje`, `Administrador`,
//! `Activo`, …); error bodies are always `{"mensaje": …}`.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

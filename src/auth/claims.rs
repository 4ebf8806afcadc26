//! Token claims and the enumerations carried inside them.
//!
//! The wire contract keeps the Spanish field names and enum values the API
//! has always exposed; Rust identifiers stay English via serde renames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Token lifetime. Tokens are stateless bearer credentials; they simply stop
/// verifying once this window elapses.
pub const TOKEN_TTL_HOURS: i64 = 100;

/// Authorization tier attached to a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "Administrador")]
    Admin,
    #[serde(rename = "Docente")]
    Teacher,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::Teacher => "Docente",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Administrador" => Some(Self::Admin),
            "Docente" => Some(Self::Teacher),
            _ => None,
        }
    }
}

/// Active/inactive flag shared by users and catalog records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RecordStatus {
    #[serde(rename = "Activo")]
    Active,
    #[serde(rename = "Inactivo")]
    Inactive,
}

impl RecordStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Inactive => "Inactivo",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Activo" => Some(Self::Active),
            "Inactivo" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Attributes encoded inside a signed token.
///
/// Deliberately capability-scoped: the stored password hash is never
/// embedded, only what authorization decisions need.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "uid")]
    pub user_id: Uuid,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "estado")]
    pub status: RecordStatus,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Build claims for a user, with expiry fixed at issue time + TTL.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: String,
        email: String,
        role: Role,
        status: RecordStatus,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            user_id,
            name,
            email,
            role,
            status,
            iat,
            exp: iat + TOKEN_TTL_HOURS * 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_wire_values() {
        assert_eq!(Role::parse("Administrador"), Some(Role::Admin));
        assert_eq!(Role::parse("Docente"), Some(Role::Teacher));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::Admin.as_str(), "Administrador");

        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"Docente\"");
    }

    #[test]
    fn record_status_round_trips_wire_values() {
        assert_eq!(RecordStatus::parse("Activo"), Some(RecordStatus::Active));
        assert_eq!(RecordStatus::parse("Inactivo"), Some(RecordStatus::Inactive));
        assert_eq!(RecordStatus::parse("activo"), None);

        let json = serde_json::to_string(&RecordStatus::Active).unwrap();
        assert_eq!(json, "\"Activo\"");
    }

    #[test]
    fn claims_expiry_is_issue_time_plus_ttl() {
        let now = Utc::now();
        let claims = Claims::new(
            Uuid::new_v4(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            Role::Admin,
            RecordStatus::Active,
            now,
        );
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn claims_serialize_with_spanish_field_names() {
        let claims = Claims::new(
            Uuid::nil(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            Role::Teacher,
            RecordStatus::Active,
            Utc::now(),
        );
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["rol"], "Docente");
        assert_eq!(value["estado"], "Activo");
        assert_eq!(value["nombre"], "Ada");
        assert!(value.get("password").is_none());
    }
}

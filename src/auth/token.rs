//! Stateless bearer token issue and verification (HS256).

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::claims::Claims;

/// Why a presented token was rejected. Collapsed to a generic 401 at the
/// HTTP boundary; the distinction stays visible in logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Signs and verifies tokens with a process-wide secret loaded at startup.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Sign the claims into a self-contained token.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or signing fails; callers surface it
    /// as an internal server error.
    pub fn issue(&self, claims: &Claims) -> anyhow::Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Check signature integrity and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// `TokenError::Expired` when the signature is valid but `exp` has
    /// passed; `TokenError::Invalid` for anything else (malformed token,
    /// signature from a different secret, missing claims).
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{RecordStatus, Role, TOKEN_TTL_HOURS};
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(&SecretString::from(secret.to_string()))
    }

    fn claims_at(issued_at: DateTime<Utc>) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "Grace".to_string(),
            "grace@example.com".to_string(),
            Role::Admin,
            RecordStatus::Active,
            issued_at,
        )
    }

    #[test]
    fn verify_before_expiry_yields_issued_claims() {
        let signer = signer("s3cr3t");
        let claims = claims_at(Utc::now());
        let token = signer.issue(&claims).unwrap();

        let decoded = signer.verify(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn verify_after_expiry_yields_expired() {
        let signer = signer("s3cr3t");
        // Issued far enough in the past that the 100h window has elapsed.
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);
        let token = signer.issue(&claims_at(issued)).unwrap();

        assert_eq!(signer.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_different_secret_is_invalid() {
        let token = signer("one-secret").issue(&claims_at(Utc::now())).unwrap();

        assert_eq!(
            signer("another-secret").verify(&token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn malformed_token_is_invalid() {
        let signer = signer("s3cr3t");
        assert_eq!(signer.verify("not-a-token"), Err(TokenError::Invalid));
        assert_eq!(signer.verify(""), Err(TokenError::Invalid));
    }
}

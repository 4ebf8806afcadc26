//! Authentication and authorization core.
//!
//! Everything needed to turn `(email, password)` into a signed bearer token
//! and to gate protected routes lives here: bcrypt password verification,
//! JWT issue/verify, and the request guards (`Authenticated`, `AdminOnly`).
//!
//! The signing secret is injected at construction time from the CLI
//! configuration; nothing in this module reads process globals.

pub mod claims;
pub mod guard;
pub mod password;
pub mod token;

pub use claims::{Claims, RecordStatus, Role};
pub use guard::{AdminOnly, Authenticated};
pub use token::{TokenError, TokenSigner};

use secrecy::SecretString;

/// Shared, read-only auth state. Built once at startup and attached to the
/// router as an `Extension<Arc<AuthState>>`.
pub struct AuthState {
    signer: TokenSigner,
}

impl AuthState {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        Self {
            signer: TokenSigner::new(secret),
        }
    }

    #[must_use]
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }
}

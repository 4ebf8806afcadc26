//! Password hashing and verification (bcrypt).
//!
//! bcrypt is CPU-bound; call sites inside request handlers wrap these in
//! `tokio::task::spawn_blocking` so the async runtime is never stalled.

use anyhow::Context;

/// Cost factor for newly stored hashes. Matches the records the system
/// already holds, so old and new hashes verify interchangeably.
pub const HASH_COST: u32 = 10;

/// Hash a plaintext password with a fresh salt.
///
/// # Errors
///
/// Returns an error if bcrypt fails internally (e.g. RNG failure).
pub fn hash_password(plaintext: &str) -> anyhow::Result<String> {
    bcrypt::hash(plaintext, HASH_COST).context("failed to hash password")
}

/// Verify a plaintext password against a stored hash.
///
/// Fails closed: a malformed stored hash counts as a mismatch, never as a
/// successful verification.
#[must_use]
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plaintext, stored_hash).unwrap_or(false)
}

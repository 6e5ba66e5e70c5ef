//! bcrypt password hashing.

use crate::error::AppError;
use std::sync::OnceLock;
use uuid::Uuid;

pub fn hash(plain: &str, cost: u32) -> Result<String, AppError> {
    bcrypt::hash(plain, cost).map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// Constant-time check of `plain` against a stored bcrypt hash. A malformed hash never verifies.
pub fn verify(plain: &str, hashed: &str) -> bool {
    match bcrypt::verify(plain, hashed) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            false
        }
    }
}

/// Hash of a random secret, made once at the first caller's cost.
fn decoy_hash(cost: u32) -> Option<&'static str> {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    DECOY
        .get_or_init(|| hash(&Uuid::new_v4().to_string(), cost).ok())
        .as_deref()
}

/// Spend one verification on a hash nothing matches, so a missing account
/// costs as long as a wrong password.
pub fn verify_decoy(plain: &str, cost: u32) {
    if let Some(h) = decoy_hash(cost) {
        let _ = verify(plain, h);
    }
}

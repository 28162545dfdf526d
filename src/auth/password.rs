//! Password hashing and verification.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a password with bcrypt at the default work factor. The only
/// failure mode is the underlying primitive failing, which is fatal to
/// the request that triggered it.
pub fn hash_password(plain: &str) -> Result<String, BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Verify a password against a stored digest. Mismatch and malformed
/// digests both read as "no match".
pub fn verify_password(plain: &str, digest: &str) -> bool {
    verify(plain, digest).unwrap_or(false)
}

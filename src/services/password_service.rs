use argon2::{Argon2, PasswordHash, PasswordVerifier};

use crate::errors::InternalError;

/// Passwords are cut to this many bytes before hashing and verification,
/// matching the underlying algorithm's input limit. Both paths must apply
/// the same truncation or long passwords would fail to verify.
const MAX_PASSWORD_BYTES: usize = 72;

/// One-way password hashing and verification.
///
/// New passwords are always hashed with bcrypt at the configured cost.
/// Verification also accepts hashes from the deprecated argon2 scheme so
/// accounts migrated from older deployments keep working; those hashes
/// are never produced here.
pub struct PasswordService {
    bcrypt_cost: u32,
}

impl PasswordService {
    /// Create a new PasswordService with the given bcrypt work factor
    pub fn new(bcrypt_cost: u32) -> Self {
        Self { bcrypt_cost }
    }

    /// Hash a plaintext password with the current scheme
    ///
    /// # Errors
    ///
    /// Returns `InternalError::Crypto` if the hasher rejects its input.
    /// The raw password is never included in errors or logs.
    pub fn hash(&self, password: &str) -> Result<String, InternalError> {
        let truncated = Self::truncate(password);
        bcrypt::hash(truncated, self.bcrypt_cost)
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))
    }

    /// Verify a plaintext password against a stored hash
    ///
    /// Dispatches on the hash prefix: `$2…` is the current bcrypt scheme,
    /// `$argon2…` the deprecated one. Unknown formats verify as false.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let truncated = Self::truncate(password);

        if stored_hash.starts_with("$argon2") {
            let parsed = PasswordHash::new(stored_hash)
                .map_err(|e| InternalError::crypto("parse_password_hash", e.to_string()))?;
            return Ok(Argon2::default().verify_password(truncated, &parsed).is_ok());
        }

        if stored_hash.starts_with("$2") {
            return bcrypt::verify(truncated, stored_hash)
                .map_err(|e| InternalError::crypto("verify_password", e.to_string()));
        }

        Ok(false)
    }

    /// Cut the password at the scheme's byte limit
    fn truncate(password: &str) -> &[u8] {
        let bytes = password.as_bytes();
        if bytes.len() > MAX_PASSWORD_BYTES {
            &bytes[..MAX_PASSWORD_BYTES]
        } else {
            bytes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cost 4 keeps these tests fast; production uses the configured value.
    fn service() -> PasswordService {
        PasswordService::new(4)
    }

    #[test]
    fn test_hash_produces_bcrypt_hash() {
        let hash = service().hash("secret123").unwrap();
        assert!(hash.starts_with("$2"));
        assert_ne!(hash, "secret123");
    }

    #[test]
    fn test_verify_succeeds_with_correct_password() {
        let svc = service();
        let hash = svc.hash("correcthorse").unwrap();
        assert!(svc.verify("correcthorse", &hash).unwrap());
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let svc = service();
        let hash = svc.hash("correcthorse").unwrap();
        assert!(!svc.verify("batterystaple", &hash).unwrap());
    }

    #[test]
    fn test_truncation_is_consistent_between_hash_and_verify() {
        let svc = service();
        let long_password: String = "x".repeat(100);

        let hash = svc.hash(&long_password).unwrap();
        assert!(svc.verify(&long_password, &hash).unwrap());

        // Anything beyond byte 72 is ignored on both paths
        let same_prefix = format!("{}{}", "x".repeat(72), "different-tail");
        assert!(svc.verify(&same_prefix, &hash).unwrap());
    }

    #[test]
    fn test_verify_accepts_deprecated_argon2_hashes() {
        use argon2::password_hash::{PasswordHasher, SaltString};

        let salt = SaltString::generate(&mut rand_core::OsRng);
        let legacy_hash = Argon2::default()
            .hash_password(b"migrated-password", &salt)
            .unwrap()
            .to_string();

        let svc = service();
        assert!(svc.verify("migrated-password", &legacy_hash).unwrap());
        assert!(!svc.verify("wrong-password", &legacy_hash).unwrap());
    }

    #[test]
    fn test_unknown_hash_format_verifies_false() {
        assert!(!service().verify("anything", "plaintext-or-garbage").unwrap());
    }
}

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::shared::AppError;

/// Argon2-based password hasher. Hashes are PHC strings carrying their
/// own salt and parameters, so verification needs no extra state.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a freshly generated salt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AppError::Internal)
    }

    /// Verifies a plaintext password against a stored PHC hash string.
    /// An unparseable hash verifies as false rather than erroring.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let password = "correct-horse-battery";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong-password", &hash));
    }

    #[test]
    fn test_salts_make_hashes_unique() {
        let hasher = Argon2Hasher::new();

        let hash1 = hasher.hash("pw").unwrap();
        let hash2 = hasher.hash("pw").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("pw", &hash1));
        assert!(hasher.verify("pw", &hash2));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-phc-string")]
    #[case("$argon2id$v=19$truncated")]
    fn test_verify_rejects_malformed_hash(#[case] stored: &str) {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("pw", stored));
    }
}

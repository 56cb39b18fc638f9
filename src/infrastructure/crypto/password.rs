//! Password hashing utilities

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Hash a password using bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hashed = hash_password("s3cret-pass", 4).unwrap();
        assert_ne!(hashed, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hashed).unwrap());
        assert!(!verify_password("wrong-pass", &hashed).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}

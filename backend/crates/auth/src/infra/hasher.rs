//! Argon2id Password Hasher

use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::services::PasswordHasher;
use crate::domain::value_object::user_password::UserPassword;
use crate::error::AuthResult;

/// [`PasswordHasher`] backed by `platform::password`
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    pepper: Option<Vec<u8>>,
}

impl Argon2PasswordHasher {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self { pepper }
    }
}

impl std::fmt::Debug for Argon2PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2PasswordHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> AuthResult<UserPassword> {
        let hashed = ClearTextPassword::new(plaintext).hash(self.pepper.as_deref())?;
        Ok(UserPassword::from_phc(hashed.as_phc_string()))
    }

    fn verify(&self, plaintext: &str, hash: &UserPassword) -> bool {
        match HashedPassword::from_phc_string(hash.as_phc_string()) {
            Ok(stored) => stored.verify(&ClearTextPassword::new(plaintext), self.pepper.as_deref()),
            Err(_) => {
                tracing::warn!("Stored password hash is not a valid PHC string");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = Argon2PasswordHasher::default();
        let hash = hasher.hash("Secret123").unwrap();

        assert!(hasher.verify("Secret123", &hash));
        assert!(!hasher.verify("Secret124", &hash));
    }

    #[test]
    fn test_hashes_differ_per_call() {
        let hasher = Argon2PasswordHasher::default();
        let a = hasher.hash("Secret123").unwrap();
        let b = hasher.hash("Secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let hasher = Argon2PasswordHasher::default();
        assert!(!hasher.verify("Secret123", &UserPassword::from_db("plain-text")));
    }

    #[test]
    fn test_pepper_must_match() {
        let peppered = Argon2PasswordHasher::new(Some(b"pepper".to_vec()));
        let hash = peppered.hash("Secret123").unwrap();

        assert!(peppered.verify("Secret123", &hash));
        assert!(!Argon2PasswordHasher::default().verify("Secret123", &hash));
    }
}

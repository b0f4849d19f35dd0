//! User Password Value Object
//!
//! The stored form of a credential: an Argon2id PHC string. Clear text never
//! reaches this type; hashing happens behind the `PasswordHasher` capability.

use std::fmt;

/// PHC-formatted password hash as persisted in `users.password_hash`
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(String);

impl UserPassword {
    /// Wrap a freshly produced PHC string
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Create from database value
    pub fn from_db(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_hash() {
        let password = UserPassword::from_db("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
        let debug = format!("{:?}", password);
        assert!(!debug.contains("argon2id"));
        assert_eq!(
            password.as_phc_string(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
        );
    }
}

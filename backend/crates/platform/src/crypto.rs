//! Cryptographic Utilities
//!
//! All randomness comes from the operating system CSPRNG.

use rand::{Rng, RngCore, rngs::OsRng};

/// Alphanumeric alphabet used for generated secrets
pub const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a random string of `len` characters drawn uniformly from `alphabet`
///
/// Returns an empty string when the alphabet is empty.
pub fn random_string(len: usize, alphabet: &str) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    (0..len)
        .map(|_| chars[OsRng.gen_range(0..chars.len())])
        .collect()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
        assert_eq!(hex::encode(random_bytes(0)), "");
    }

    #[test]
    fn test_random_string_uses_alphabet() {
        let code = random_string(6, "0123456789");
        assert_eq!(code.chars().count(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_random_string_varies() {
        let a = random_string(32, ALPHANUMERIC);
        let b = random_string(32, ALPHANUMERIC);
        assert_ne!(a, b);
    }

    #[test]
    fn test_random_string_empty_alphabet() {
        assert_eq!(random_string(8, ""), "");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"123456", b"123456"));
        assert!(!constant_time_eq(b"123456", b"123457"));
        assert!(!constant_time_eq(b"12345", b"123456"));
        assert!(constant_time_eq(b"", b""));
    }
}

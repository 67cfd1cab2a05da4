//! Validator signing key.

use sha2::{Digest, Sha256};
use std::fmt;

const PREFIX: &str = "0x";
const HEX_LEN: usize = 64;

/// A `0x`-prefixed 32-byte hex private key.
///
/// Debug output never shows the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Accepts exactly `0x` followed by 64 hex digits (either case)
    pub fn parse(input: &str) -> Option<Self> {
        let digits = input.strip_prefix(PREFIX)?;
        if digits.len() != HEX_LEN || hex::decode(digits).is_err() {
            return None;
        }
        Some(Self(input.to_string()))
    }

    /// The key as passed to the validator
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 8 bytes of SHA-256 over the key, hex encoded
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.to_ascii_lowercase().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_accepts_valid_key() {
        let key = PrivateKey::parse(VALID).unwrap();
        assert_eq!(key.expose(), VALID);
    }

    #[test]
    fn test_accepts_mixed_case_hex() {
        let mixed = "0x4C0883A69102937D6231471B5DBB6204FE5129617082792AE468D01A3F362318";
        assert!(PrivateKey::parse(mixed).is_some());
    }

    #[test]
    fn test_rejects_malformed_keys() {
        let too_short = &VALID[..65];
        let too_long = format!("{}0", VALID);
        let no_prefix = &VALID[2..];
        let upper_prefix = VALID.replacen("0x", "0X", 1);
        let non_hex = VALID.replacen('4', "g", 1);
        let padded = format!(" {}", VALID);
        for bad in ["", "0x", too_short, too_long.as_str(), no_prefix, upper_prefix.as_str(), non_hex.as_str(), padded.as_str()] {
            assert!(PrivateKey::parse(bad).is_none(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let key = PrivateKey::parse(VALID).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&VALID[2..]));
        assert_eq!(key.fingerprint().len(), 16);
    }

    #[test]
    fn test_fingerprint_ignores_case() {
        let lower = PrivateKey::parse(VALID).unwrap();
        let upper = PrivateKey::parse(&format!("0x{}", VALID[2..].to_ascii_uppercase())).unwrap();
        assert_eq!(lower.fingerprint(), upper.fingerprint());
    }
}

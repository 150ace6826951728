use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Derives a batch entry id (or deduplication id) from the message bytes.
pub type IdFn = Arc<dyn Fn(&[u8]) -> String + Send + Sync>;

/// Hex SHA-256 digest. 64 characters, which fits both the 80 character
/// batch entry id limit and the 128 character deduplication id limit.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

pub fn default_id_fn() -> IdFn {
    Arc::new(sha256_hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha256_hex_is_a_valid_entry_id() {
        let id = sha256_hex("any message body".as_bytes());
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

//! UUIDv4 identifier tokens.

use uuid::{Uuid, Version};

/// Mint a fresh random UUIDv4 token in its hyphenated lowercase form.
pub fn mint() -> String {
    Uuid::new_v4().to_string()
}

/// Returns `true` if `token` is a well-formed UUIDv4.
pub fn is_uuid_v4(token: &str) -> bool {
    Uuid::parse_str(token)
        .map(|uuid| uuid.get_version() == Some(Version::Random))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_tokens_are_v4() {
        let token = mint();
        assert_eq!(token.len(), 36);
        assert!(is_uuid_v4(&token));
    }

    #[test]
    fn minted_tokens_are_unique() {
        assert_ne!(mint(), mint());
    }

    #[test]
    fn rejects_non_v4() {
        assert!(!is_uuid_v4("test-a"));
        assert!(!is_uuid_v4(""));
        // nil UUID has no version
        assert!(!is_uuid_v4("00000000-0000-0000-0000-000000000000"));
    }
}

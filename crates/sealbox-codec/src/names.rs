//! Content-addressed blob naming
//!
//! The stored name of a blob is derived from the SHA-256 of the *original
//! plaintext* (not the compressed or encrypted bytes): the first 16 hex
//! chars plus a `.bin` extension. Identical inputs therefore always map to
//! the same name, which makes re-runs idempotent and deduplicates storage,
//! while the name itself leaks nothing about the original file name.

use crate::digest::Digest;

/// CDN-relative directory the consuming application fetches blobs from
pub const CDN_PREFIX: &str = "assets";

/// Hex chars of the plaintext digest kept in the blob name
const NAME_HEX_LEN: usize = 16;

/// Derive the obfuscated storage name for a plaintext digest.
pub fn obfuscated_name(digest: &Digest) -> String {
    let hex = hex::encode(digest);
    format!("{}.bin", &hex[..NAME_HEX_LEN])
}

/// CDN-relative path for an obfuscated name.
pub fn cdn_path(name: &str) -> String {
    format!("{CDN_PREFIX}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digest_bytes;
    use proptest::prelude::*;

    #[test]
    fn name_is_16_hex_chars_plus_extension() {
        let name = obfuscated_name(&digest_bytes(b"some document"));
        assert_eq!(name.len(), NAME_HEX_LEN + 4);
        assert!(name.ends_with(".bin"));
        assert!(name[..NAME_HEX_LEN]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn name_is_prefix_of_full_digest() {
        let digest = digest_bytes(b"abc");
        let name = obfuscated_name(&digest);
        assert!(hex::encode(digest).starts_with(name.trim_end_matches(".bin")));
    }

    #[test]
    fn cdn_path_is_under_assets() {
        assert_eq!(cdn_path("0123456789abcdef.bin"), "assets/0123456789abcdef.bin");
    }

    proptest! {
        #[test]
        fn same_content_same_name(data in proptest::collection::vec(any::<u8>(), 0..=2048)) {
            let n1 = obfuscated_name(&digest_bytes(&data));
            let n2 = obfuscated_name(&digest_bytes(&data));
            prop_assert_eq!(n1, n2, "naming must be content-addressed");
        }
    }
}

//! Key material lifecycle: load, validate, use, erase
//!
//! The 32-byte key lives in exactly one `AssetKey` value for the duration
//! of a run. Erasure is explicit (`erase()`) on the orchestrator's exit
//! paths, with zeroize-on-drop as the backstop for panics and early
//! returns. The key value is never logged: `Debug` renders `[REDACTED]`.

use rand::RngCore;
use std::path::Path;
use zeroize::Zeroize;

use sealbox_core::{SealboxError, SealboxResult};

use crate::KEY_SIZE;

/// The run's 256-bit asset encryption key. Zeroized on drop.
pub struct AssetKey {
    bytes: [u8; KEY_SIZE],
}

impl AssetKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Overwrite the key material with zeros in place.
    ///
    /// The value stays alive afterwards so callers (and tests) can observe
    /// that the buffer no longer holds the key.
    pub fn erase(&mut self) {
        self.bytes.zeroize();
    }

    /// Whether the in-memory buffer has been zeroized.
    pub fn is_erased(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

impl Drop for AssetKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Load and validate the key from a provisioned binary file.
///
/// A missing file or any length other than exactly 32 bytes is a fatal
/// condition: there is no partial-key or default-key fallback. The
/// transient read buffer is zeroized on every path, including the
/// length-mismatch rejection.
pub fn load_key(path: &Path) -> SealboxResult<AssetKey> {
    if !path.exists() {
        return Err(SealboxError::KeyMaterial(format!(
            "key file not found: {}",
            path.display()
        )));
    }

    let mut raw = std::fs::read(path)?;
    if raw.len() != KEY_SIZE {
        let got = raw.len();
        raw.zeroize();
        return Err(SealboxError::KeyMaterial(format!(
            "key file {} is {got} bytes, expected exactly {KEY_SIZE}",
            path.display()
        )));
    }

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&raw);
    raw.zeroize();

    Ok(AssetKey::from_bytes(bytes))
}

/// Generate a random 256-bit key.
pub fn generate_key() -> AssetKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    AssetKey::from_bytes(bytes)
}

/// Write a key to disk for out-of-band provisioning.
///
/// Refuses to overwrite an existing file. On Unix the file is created
/// owner-readable only (0o600).
pub fn write_key_file(path: &Path, key: &AssetKey) -> SealboxResult<()> {
    if path.exists() {
        return Err(SealboxError::KeyMaterial(format!(
            "refusing to overwrite existing key file: {}",
            path.display()
        )));
    }

    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(key.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_differ() {
        let k1 = generate_key();
        let k2 = generate_key();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn erase_zeroizes_in_place() {
        let mut key = AssetKey::from_bytes([0xa7u8; KEY_SIZE]);
        assert!(!key.is_erased());
        key.erase();
        assert!(key.is_erased());
        assert_eq!(key.as_bytes(), &[0u8; KEY_SIZE]);
    }

    #[test]
    fn debug_never_prints_key_bytes() {
        let key = AssetKey::from_bytes([0x42u8; KEY_SIZE]);
        let printed = format!("{key:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("42"));
    }

    #[test]
    fn load_valid_key_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sealbox.key");
        std::fs::write(&path, [0x11u8; KEY_SIZE]).unwrap();

        let key = load_key(&path).unwrap();
        assert_eq!(key.as_bytes(), &[0x11u8; KEY_SIZE]);
    }

    #[test]
    fn load_missing_key_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_key(&dir.path().join("absent.key")).unwrap_err();
        assert!(matches!(err, SealboxError::KeyMaterial(_)));
    }

    #[test]
    fn load_short_key_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("short.key");
        std::fs::write(&path, [0u8; 16]).unwrap();
        let err = load_key(&path).unwrap_err();
        assert!(matches!(err, SealboxError::KeyMaterial(_)));
        assert!(err.to_string().contains("16 bytes"));
    }

    #[test]
    fn load_long_key_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("long.key");
        std::fs::write(&path, [0u8; 33]).unwrap();
        assert!(matches!(
            load_key(&path).unwrap_err(),
            SealboxError::KeyMaterial(_)
        ));
    }

    #[test]
    fn write_then_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("new.key");
        let key = generate_key();
        write_key_file(&path, &key).unwrap();

        let loaded = load_key(&path).unwrap();
        assert_eq!(loaded.as_bytes(), key.as_bytes());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn write_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("existing.key");
        std::fs::write(&path, b"whatever").unwrap();
        let err = write_key_file(&path, &generate_key()).unwrap_err();
        assert!(matches!(err, SealboxError::KeyMaterial(_)));
    }
}

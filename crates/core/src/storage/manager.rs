use crate::errors::CoreError;
use crate::models::ledger::LedgerFile;

use super::encryption::{self, KdfParams};
use super::format;

/// Encrypted snapshots of a [`LedgerFile`], as bytes or as files on disk.
///
/// Flow: LedgerFile → bincode → AES-256-GCM(Argon2id(password)) → PLDG framing
pub struct StorageManager;

impl StorageManager {
    /// Encrypt with the default KDF cost.
    pub fn save_to_bytes(file: &LedgerFile, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_to_bytes_with(file, password, KdfParams::default())
    }

    /// Encrypt with explicit KDF cost parameters.
    pub fn save_to_bytes_with(
        file: &LedgerFile,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(file)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, kdf_params)?;
        Ok(format::encode(&sealed))
    }

    /// Decrypt and deserialize. The KDF cost is read from the header.
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<LedgerFile, CoreError> {
        let sealed = format::decode(data)?;
        let plaintext = encryption::open(&sealed, password)?;
        bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize ledger: {e}")))
    }

    /// Save to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(file: &LedgerFile, path: &str, password: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(file, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<LedgerFile, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}

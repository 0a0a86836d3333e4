use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::errors::CoreError;
use crate::models::ledger::{Ledger, LedgerFile};
use crate::models::request::PasswordChange;

use super::encryption::KdfParams;
use super::manager::StorageManager;

const FILE_EXTENSION: &str = "pldg";
const MAX_USER_ID_LEN: usize = 64;

/// Per-user persistence of ledger files, keyed by a user identity.
///
/// Every operation that reads or destroys data takes the user's password
/// and verifies it by decrypting the stored record first.
pub trait LedgerStore {
    /// Whether a record exists for `user_id`.
    fn exists(&self, user_id: &str) -> Result<bool, CoreError>;

    /// Create a new record. Fails with `AccountExists` if one is already there.
    fn create(&self, user_id: &str, password: &str, file: &LedgerFile) -> Result<(), CoreError>;

    /// Load and decrypt a record.
    fn load(&self, user_id: &str, password: &str) -> Result<LedgerFile, CoreError>;

    /// Overwrite an existing record. `password` must open the current record.
    fn save(&self, user_id: &str, password: &str, file: &LedgerFile) -> Result<(), CoreError>;

    /// Drop every position of the user, keeping the account and its settings.
    fn reset(&self, user_id: &str, password: &str) -> Result<(), CoreError> {
        let mut file = self.load(user_id, password)?;
        file.ledger = Ledger::new();
        self.save(user_id, password, &file)
    }

    /// Remove the user's record entirely.
    fn delete_account(&self, user_id: &str, password: &str) -> Result<(), CoreError>;

    /// Re-encrypt the record under a new password.
    fn change_password(&self, user_id: &str, change: &PasswordChange) -> Result<(), CoreError>;
}

/// Stores one encrypted `<user_id>.pldg` file per user under a root directory.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    root: PathBuf,
    kdf_params: KdfParams,
}

impl FileLedgerStore {
    /// Create the store, creating `root` if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::with_kdf_params(root, KdfParams::default())
    }

    pub fn with_kdf_params(root: impl Into<PathBuf>, kdf_params: KdfParams) -> Result<Self, CoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, kdf_params })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a user's file. User ids are restricted to ASCII alphanumerics,
    /// `-` and `_` so they can never escape the root directory.
    pub fn path_for(&self, user_id: &str) -> Result<PathBuf, CoreError> {
        let valid = !user_id.is_empty()
            && user_id.len() <= MAX_USER_ID_LEN
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CoreError::ValidationError(format!(
                "Invalid user id '{user_id}': use 1-{MAX_USER_ID_LEN} letters, digits, '-' or '_'"
            )));
        }
        Ok(self.root.join(format!("{user_id}.{FILE_EXTENSION}")))
    }

    fn existing_path(&self, user_id: &str) -> Result<PathBuf, CoreError> {
        let path = self.path_for(user_id)?;
        if !path.exists() {
            return Err(CoreError::AccountNotFound(user_id.to_string()));
        }
        Ok(path)
    }

    fn write(&self, path: &Path, password: &str, file: &LedgerFile) -> Result<(), CoreError> {
        let bytes = StorageManager::save_to_bytes_with(file, password, self.kdf_params)?;
        // Write beside the target, then rename, so a crash never leaves half a file.
        let tmp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));
        std::fs::write(&tmp, bytes)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

impl LedgerStore for FileLedgerStore {
    fn exists(&self, user_id: &str) -> Result<bool, CoreError> {
        Ok(self.path_for(user_id)?.exists())
    }

    fn create(&self, user_id: &str, password: &str, file: &LedgerFile) -> Result<(), CoreError> {
        let path = self.path_for(user_id)?;
        if path.exists() {
            return Err(CoreError::AccountExists(user_id.to_string()));
        }
        self.write(&path, password, file)?;
        info!("Created ledger for {user_id}");
        Ok(())
    }

    fn load(&self, user_id: &str, password: &str) -> Result<LedgerFile, CoreError> {
        let path = self.existing_path(user_id)?;
        let bytes = std::fs::read(&path)?;
        StorageManager::load_from_bytes(&bytes, password)
    }

    fn save(&self, user_id: &str, password: &str, file: &LedgerFile) -> Result<(), CoreError> {
        let path = self.existing_path(user_id)?;
        self.load(user_id, password)?;
        self.write(&path, password, file)?;
        debug!("Saved ledger for {user_id} ({} positions)", file.ledger.len());
        Ok(())
    }

    fn delete_account(&self, user_id: &str, password: &str) -> Result<(), CoreError> {
        self.load(user_id, password)?;
        std::fs::remove_file(self.existing_path(user_id)?)?;
        info!("Deleted ledger for {user_id}");
        Ok(())
    }

    fn change_password(&self, user_id: &str, change: &PasswordChange) -> Result<(), CoreError> {
        change.validate()?;
        let file = self.load(user_id, &change.current)?;
        self.write(&self.existing_path(user_id)?, &change.new, &file)?;
        info!("Changed password for {user_id}");
        Ok(())
    }
}

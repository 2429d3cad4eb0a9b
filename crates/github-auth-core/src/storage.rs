use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use async_trait::async_trait;

use crate::config::ConfigLocator;
use crate::error::AuthError;

/// Secret-storage facility provided by the host. One fixed key is used
/// for this crate's session records; absence of the key means "no
/// sessions".
#[async_trait]
pub trait SecretStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AuthError>;
    async fn store(&self, key: &str, value: &str) -> Result<(), AuthError>;
    async fn delete(&self, key: &str) -> Result<(), AuthError>;
}

/// Filesystem-backed secret storage for hosts without a native vault.
/// Each key maps to a user-only file under the data directory.
pub struct FileSecretStorage {
    locator: ConfigLocator,
}

impl FileSecretStorage {
    pub fn new(locator: ConfigLocator) -> Self {
        Self { locator }
    }

    pub fn with_default_locator() -> Result<Self, AuthError> {
        Ok(Self::new(ConfigLocator::new()?))
    }

    fn write_file(path: &Path, payload: &str) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(payload.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perm = file.metadata()?.permissions();
            perm.set_mode(0o600);
            fs::set_permissions(path, perm)?;
        }

        Ok(())
    }
}

#[async_trait]
impl SecretStorage for FileSecretStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        let path = self.locator.secret_file(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    async fn store(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let path = self.locator.secret_file(key);
        Self::write_file(&path, value)
    }

    async fn delete(&self, key: &str) -> Result<(), AuthError> {
        let path = self.locator.secret_file(key);
        match fs::remove_file(path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> FileSecretStorage {
        let locator = ConfigLocator::from_root_for_tests(temp_dir.path().to_path_buf());
        FileSecretStorage::new(locator)
    }

    #[tokio::test]
    async fn round_trip_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let storage = store(&temp_dir);

        storage.store("some-key", "[{\"id\":\"session1\"}]").await.unwrap();
        let loaded = storage.get("some-key").await.unwrap();
        assert_eq!(loaded.as_deref(), Some("[{\"id\":\"session1\"}]"));

        storage.delete("some-key").await.unwrap();
        assert!(storage.get("some-key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = store(&temp_dir);
        assert!(storage.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let storage = store(&temp_dir);
        storage.delete("missing").await.unwrap();
    }
}

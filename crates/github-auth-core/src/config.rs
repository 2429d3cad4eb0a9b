use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

/// OAuth app client id used for the device flow.
pub const CLIENT_ID: &str = "6eca49f4665a4f41b9c3";

pub(crate) const USER_AGENT: &str = "github-auth-rs/0.1.0";

/// Locates the directory backing the file-based secret store.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    root: PathBuf,
}

impl ConfigLocator {
    /// Discover the persistent storage directory, creating it if needed.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("app", "github-auth", "github-auth-rs")
            .ok_or(ConfigError::MissingProjectDirs)?;
        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).map_err(ConfigError::CreateDir)?;
        set_user_only_permissions(data_dir)?;
        Ok(Self {
            root: data_dir.to_path_buf(),
        })
    }

    /// Path of the file holding the secret value for the given key.
    pub fn secret_file(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.secret"))
    }

    #[cfg(test)]
    pub(crate) fn from_root_for_tests(root: PathBuf) -> Self {
        Self { root }
    }
}

fn set_user_only_permissions(path: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        let metadata = fs::metadata(path)?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o700);
        fs::set_permissions(path, permissions)?;
        Ok(())
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}

/// Errors that can occur when working with the storage directory.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine storage directory for github-auth-rs")]
    MissingProjectDirs,
    #[error("failed to create storage directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("filesystem error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn secret_file_appends_key() {
        let temp_dir = TempDir::new().unwrap();
        let locator = ConfigLocator::from_root_for_tests(temp_dir.path().to_path_buf());
        let path = locator.secret_file("github-authentication-sessions");
        assert!(path.ends_with("github-authentication-sessions.secret"));
    }
}

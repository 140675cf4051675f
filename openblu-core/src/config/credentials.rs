//! Persisted API key
//!
//! The key is stored as the sole content of a plain file. A key found in the
//! file wins over one passed on the command line.

use crate::error::{OpenBluError, Result};
use std::path::{Path, PathBuf};

/// File-backed store for a single API key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored key.
    ///
    /// Returns `None` when the file is missing or blank. One trailing line
    /// break is dropped so hand-edited files work.
    pub fn load(&self) -> Result<Option<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let key = content
            .strip_suffix("\r\n")
            .or_else(|| content.strip_suffix('\n'))
            .unwrap_or(content.as_str());

        if key.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(key.to_string()))
        }
    }

    /// Overwrite the stored key with exactly `key`.
    pub fn save(&self, key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(OpenBluError::Usage(
                "Refusing to store an empty access key".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(&self.path, key)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Pick the key to use: the stored key first, then the flag value.
    pub fn resolve(&self, flag: Option<&str>) -> Result<Option<String>> {
        if let Some(stored) = self.load()? {
            return Ok(Some(stored));
        }
        Ok(flag
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.to_string()))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

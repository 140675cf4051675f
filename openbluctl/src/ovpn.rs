//! Writing downloaded OpenVPN configurations to disk

use openblu_core::{OpenBluError, Result};
use std::path::{Path, PathBuf};

/// Reject identifiers that would escape the target directory.
pub fn validate_server_id(id: &str) -> Result<()> {
    let bad = id.trim().is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.contains('\0');
    if bad {
        return Err(OpenBluError::Usage(format!(
            "'{}' is not a valid server identifier",
            id
        )));
    }
    Ok(())
}

/// Path of the configuration file for server `id` inside `dir`
pub fn config_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.ovpn", id))
}

/// Write `blob` to `<dir>/<id>.ovpn`, replacing any previous file.
pub fn save_config(dir: &Path, id: &str, blob: &str) -> Result<PathBuf> {
    validate_server_id(id)?;
    let path = config_path(dir, id);
    std::fs::write(&path, blob)?;
    Ok(path)
}

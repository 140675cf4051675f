//! Default path resolution for local files
//!
//! Uses the XDG config directory when available, with a fallback to the
//! current directory.

use std::path::PathBuf;

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("openblu")
}

/// Returns the default path for the CLI settings file.
///
/// - Linux: `~/.config/openblu/cli.toml`
/// - Fallback: `./openblu/cli.toml`
pub fn default_config_path() -> PathBuf {
    config_dir().join("cli.toml")
}

/// Returns the default path of the stored API key.
///
/// - Linux: `~/.config/openblu/access_key`
/// - Fallback: `./openblu/access_key`
pub fn default_credential_path() -> PathBuf {
    config_dir().join("access_key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_is_toml() {
        let path = default_config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        assert!(path.ends_with("openblu/cli.toml"));
    }

    #[test]
    fn test_default_credential_path() {
        assert!(default_credential_path().ends_with("openblu/access_key"));
    }
}

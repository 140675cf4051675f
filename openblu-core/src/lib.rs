//! OpenBlu Core Library
//!
//! Shared types, API models, credential storage and the listing pipeline
//! used by the `openbluctl` command-line client.

pub mod api;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, default_credential_path, CredentialStore};
pub use error::*;
pub use pipeline::Pipeline;
pub use types::*;

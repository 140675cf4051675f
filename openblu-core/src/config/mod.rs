//! Local state for the OpenBlu client
//!
//! - [`CredentialStore`] - the persisted API key
//! - [`default_config_path`] / [`default_credential_path`] - where files live

mod credentials;
mod paths;

pub use credentials::CredentialStore;
pub use paths::{default_config_path, default_credential_path};

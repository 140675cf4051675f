//! OpenBlu CLI Library
//!
//! This library provides the core functionality for the `openbluctl` tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::OpenBluClient`] which provides
//! programmatic access to the OpenBlu directory. Configuration types are also
//! available via [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use openbluctl::client::OpenBluClient;
//! use openblu_core::{OrderField, OrderSpec, Pipeline, SortDirection};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = OpenBluClient::with_config(
//!     "https://api.intellivoid.info/openblu/v1".to_string(),
//!     10, // timeout in seconds
//! )?;
//!
//! let servers = client.list_servers("my-access-key").await?;
//! let pipeline = Pipeline::new(
//!     None,
//!     Some(OrderSpec::new(OrderField::Ping, SortDirection::Ascending)),
//!     3,
//! );
//! for server in pipeline.apply(servers) {
//!     println!("{} {} {} ms", server.id, server.country, server.ping);
//! }
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the OpenBlu directory API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Saving `.ovpn` files.
pub mod ovpn;

#[cfg(test)]
pub mod test_utils;

//! CLI definition and action handlers
//!
//! - [`commands`] - Flag definitions and action selection
//! - [`handlers`] - Action execution

mod commands;
mod handlers;

pub use commands::*;
pub use handlers::*;

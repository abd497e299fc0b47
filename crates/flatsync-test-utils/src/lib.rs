//! Shared test utilities for the flatsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`host`]: [`TestHost`], a temporary directory standing in for `/etc`
//! - [`fixtures`]: sample backing-file content

pub mod fixtures;
pub mod host;

pub use host::TestHost;

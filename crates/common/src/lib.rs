//! Shared types, config, and error definitions for slopescout.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod types;

pub use api::ResortApi;
pub use config::AppConfig;
pub use error::Error;
pub use filter::ResortFilter;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;

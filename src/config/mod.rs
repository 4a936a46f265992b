//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → MultichainConfig (the raw mapping)
//!     → ConnectionConfig::from_config (immutable, owned by the client)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - No semantic validation beyond the transport tag: a bad host or port
//!   fails at call time

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{ConnectionConfig, MultichainConfig, RpcConfig};

//! Configuration module for the Korean ↔ Thai relay.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the server,
//! completion API, translation style and reply API, `AppPaths` for the
//! settings file location, and TOML persistence plus environment overrides.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, LlmConfig, MessagingConfig, NonPostPolicy, OutputFormat, SchemaDialect,
    ServerConfig, StyleConfig,
};

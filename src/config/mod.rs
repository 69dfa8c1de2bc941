//! Configuration management for magicwatch.
//!
//! Supports configuration from:
//! - Command-line arguments (highest priority)
//! - Environment variables (logging options only)

mod settings;

pub use settings::Config;

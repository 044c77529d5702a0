//! Configuration for diff-anchor
//!
//! This crate provides:
//! - Config directory utilities
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::{AppConfig, DEFAULT_MAX_DIFF_BYTES};
pub use config_file::load_config_file;

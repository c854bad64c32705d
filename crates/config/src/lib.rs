//! Configuration module for ts2mp4
//!
//! Handles loading configuration from TOML files and environment variable overrides.

pub mod config;

pub use config::*;

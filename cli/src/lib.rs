//! CLI utilities for kwsprep.
//!
//! This crate provides configuration loading and result rendering for the
//! `kwsprep` binary.

pub mod config;
pub mod output;

pub use config::{
    default_config_path, load_config, parse_config, save_config, ConfigError, LoadedConfig,
    PrepConfig,
};
pub use output::{Output, OutputFormat};

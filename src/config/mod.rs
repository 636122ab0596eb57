//! Configuration layer for suspend-gate.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Resolved settings ([`Settings`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values resolve with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! Boolean flags (`--smart-suspend`, `--doze`) use OR semantics: set
//! `true` in either CLI or TOML means `true`; flags only enable, never
//! disable.
//!
//! # Internal Tuning Parameters
//!
//! The watcher debounce delay (500 ms) is tuned for typical OS
//! notification bursts and is deliberately not configurable here.

mod cli;
pub mod defaults;
mod error;
mod settings;
mod toml;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use settings::{Settings, default_config_path, write_default_config};
pub use toml::{TomlConfig, default_config_template};

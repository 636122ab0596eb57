//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration that can be
/// merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Smart suspend configuration section
    #[serde(default)]
    pub smart_suspend: SmartSuspendSection,

    /// Doze suspend configuration section
    #[serde(default)]
    pub doze: DozeSection,

    /// Monitoring configuration
    #[serde(default)]
    pub monitor: MonitorSection,
}

/// Smart suspend configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmartSuspendSection {
    /// Whether smart suspend is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Comma-separated IP rules, at most two are used
    pub rules: Option<String>,
}

/// Doze suspend configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DozeSection {
    /// Whether doze suspend is enabled
    #[serde(default)]
    pub enabled: bool,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Link polling interval in seconds
    pub poll_interval: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# suspend-gate Configuration File

[smart_suspend]
# Suspend the engine while a device address matches one of the rules.
enabled = false

# Comma-separated IP rules; at most two are used.
# Each rule is a literal IPv4 address or a CIDR range.
# rules = "192.168.1.0/24,10.0.0.1"

[doze]
# Suspend the engine while the screen is off and the device is idle.
enabled = false

[monitor]
# Link polling interval in seconds (default: 60)
poll_interval = 60
"#
    .to_string()
}

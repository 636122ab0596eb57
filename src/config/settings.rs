//! Resolved settings after merging CLI and TOML sources.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::{TomlConfig, default_config_template};

/// Final settings used by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Whether smart suspend (IP-rule matching) is enabled.
    pub smart_suspend_enabled: bool,

    /// Raw comma-separated IP rules; at most two are used.
    pub rules: String,

    /// Whether doze suspend (screen off + idle) is enabled.
    pub doze_enabled: bool,

    /// Link polling interval.
    pub poll_interval: Duration,

    /// Verbose logging enabled.
    pub verbose: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ smart_suspend: {}, rules: \"{}\", doze: {}, poll_interval: {}s }}",
            self.smart_suspend_enabled,
            self.rules,
            self.doze_enabled,
            self.poll_interval.as_secs(),
        )
    }
}

impl Settings {
    /// Creates settings from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML values; boolean flags
    /// use OR semantics (either source can enable, neither can
    /// disable the other).
    ///
    /// # Errors
    ///
    /// Returns an error if the poll interval is zero.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let smart_suspend_enabled =
            cli.smart_suspend || toml.is_some_and(|t| t.smart_suspend.enabled);

        let rules = cli
            .rules
            .clone()
            .or_else(|| toml.and_then(|t| t.smart_suspend.rules.clone()))
            .unwrap_or_default();

        let doze_enabled = cli.doze || toml.is_some_and(|t| t.doze.enabled);

        let poll_interval = Self::resolve_poll_interval(cli, toml)?;

        Ok(Self {
            smart_suspend_enabled,
            rules,
            doze_enabled,
            poll_interval,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and the config file.
    ///
    /// If `cli.config` is set, that file must exist and parse. With no
    /// explicit path, the default location (see
    /// [`default_config_path`]) is loaded when present and silently
    /// skipped otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file cannot be read or
    /// parsed, or if the merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            match default_config_path() {
                Some(path) if path.exists() => Some(TomlConfig::load(&path)?),
                _ => None,
            }
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_poll_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let secs = cli
            .poll_interval
            .or_else(|| toml.and_then(|t| t.monitor.poll_interval))
            .unwrap_or(defaults::POLL_INTERVAL_SECS);

        if secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "poll_interval",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Duration::from_secs(secs))
    }
}

/// Returns the default configuration file location, typically
/// `<config dir>/suspend-gate/suspend-gate.toml`.
///
/// `None` when the platform reports no config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("suspend-gate").join("suspend-gate.toml"))
}

/// Writes the default configuration template to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, default_config_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

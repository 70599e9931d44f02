// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de;
use todosync_rest::RestConfig;

use crate::fault::FaultClassifier;

/// The name of the application.
pub const APP_NAME: &str = "todosync";

const DB_FILENAME: &str = "todosync.db";

/// Configuration for the application.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Directory for storing application state, including the local database.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    /// The user recorded as owner and author of local changes.
    #[serde(default)]
    pub user_id: Option<String>,

    /// The remote backend. Without it, changes stay queued locally.
    #[serde(default)]
    pub backend: Option<RestConfig>,

    /// Upload behaviour.
    #[serde(default)]
    pub upload: UploadConfig,
}

impl Config {
    /// Normalize the configuration.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        match &self.state_dir {
            Some(a) => {
                self.state_dir = Some(
                    expand_path(a)
                        .map_err(|e| format!("Failed to expand state directory path: {e}"))?,
                )
            }

            None => match get_state_dir() {
                Ok(a) => self.state_dir = Some(a.join(APP_NAME)),
                Err(e) => tracing::warn!(err = %e, "failed to get state directory"),
            },
        };

        self.upload.validate()
    }

    /// Path of the local database, or `None` to keep it in memory.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(|a| a.join(DB_FILENAME))
    }

    /// The fault classifier, with the configured permanent codes checked
    /// before the defaults.
    pub fn classifier(&self) -> Result<FaultClassifier, Box<dyn Error>> {
        FaultClassifier::with_permanent_codes(&self.upload.permanent_codes)
            .map_err(|e| format!("Invalid permanent fault code pattern: {e}").into())
    }
}

/// Settings of the upload loop.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UploadConfig {
    /// Extra fault code patterns treated as permanent, as regular expressions.
    #[serde(default)]
    pub permanent_codes: Vec<String>,

    /// Time between upload rounds while watching.
    #[serde(default = "default_interval")]
    pub interval: ConfigDuration,

    /// Base delay before retrying after a transient fault. Doubles on each
    /// consecutive failure.
    #[serde(default = "default_retry_delay")]
    pub retry_delay: ConfigDuration,
}

impl UploadConfig {
    /// Rejects zero durations, which would make the upload loop spin.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.interval.get().is_zero() {
            return Err("Upload interval must be greater than zero".into());
        }
        if self.retry_delay.get().is_zero() {
            return Err("Upload retry delay must be greater than zero".into());
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            permanent_codes: Vec::new(),
            interval: default_interval(),
            retry_delay: default_retry_delay(),
        }
    }
}

const fn default_interval() -> ConfigDuration {
    ConfigDuration(Duration::from_secs(30))
}

const fn default_retry_delay() -> ConfigDuration {
    ConfigDuration(Duration::from_secs(5))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDuration(Duration);

impl ConfigDuration {
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub const fn get(&self) -> Duration {
        self.0
    }
}

impl<'de> serde::Deserialize<'de> for ConfigDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DurationVisitor;

        impl<'de> de::Visitor<'de> for DurationVisitor {
            type Value = ConfigDuration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a duration string like "HH:MM", "1h", "60m", or "30s""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_duration(value)
                    .map(ConfigDuration)
                    .map_err(|e| de::Error::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(DurationVisitor)
    }
}

/// Handle tilde (~) and environment variables in the path
pub fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle config directories
    let config_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_CONFIG_HOME/", "${XDG_CONFIG_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in config_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_config_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or("User-specific home directory not found".into())
}

/// The user-specific configuration directory.
pub fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(windows)]
    let config_dir = dirs::config_dir();
    config_dir.ok_or("User-specific config directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_dir();
    state_dir.ok_or("User-specific state directory not found".into())
}

/// Parse a duration string in the format "HH:MM" / "1h" / "60m" / "1800s".
fn parse_duration(s: &str) -> Result<Duration, Box<dyn Error>> {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;

    let secs = |value: &str, unit: u64| -> Result<u64, Box<dyn Error>> {
        let value: u64 = value.trim().parse()?;
        value
            .checked_mul(unit)
            .ok_or_else(|| format!("Duration out of range: {s}").into())
    };

    // Try to parse "HH:MM" format
    if let Some((h, m)) = s.split_once(':') {
        let total = secs(h, HOUR)?
            .checked_add(secs(m, MINUTE)?)
            .ok_or_else(|| format!("Duration out of range: {s}"))?;
        Ok(Duration::from_secs(total))
    }
    // Match suffix-based formats
    else if let Some(rest) = s.strip_suffix("ms") {
        let millis: u64 = rest.trim().parse()?;
        Ok(Duration::from_millis(millis))
    } else if let Some(rest) = s.strip_suffix("h") {
        Ok(Duration::from_secs(secs(rest, HOUR)?))
    } else if let Some(rest) = s.strip_suffix("m") {
        Ok(Duration::from_secs(secs(rest, MINUTE)?))
    } else if let Some(rest) = s.strip_suffix("s") {
        Ok(Duration::from_secs(secs(rest, 1)?))
    } else {
        Err(format!("Invalid duration format: {s}").into())
    }
}

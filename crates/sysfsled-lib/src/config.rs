//! Daemon configuration: TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::identity::{self, DEFAULT_OBJECT_PATH};
use crate::led::{BlinkProfile, DEFAULT_DUTY_ON, DEFAULT_PERIOD_MS};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# sysfsled configuration: changes made outside the tool may be overwritten.\n\n";

/// Where the kernel exposes LED class devices.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/leds";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LED class directory holding one attribute directory per LED.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,

    /// Object path prefix LEDs are published under.
    #[serde(default = "default_object_path")]
    pub object_path: String,

    /// Raw LED names (`device[:color[:function]]`) to register.
    #[serde(default)]
    pub leds: Vec<String>,

    /// Blink duty cycle in percent applied to newly registered LEDs.
    #[serde(default = "default_duty_on")]
    pub duty_on: u8,

    /// Blink period in milliseconds applied to newly registered LEDs.
    #[serde(default = "default_period_ms")]
    pub period_ms: u32,
}

fn default_sysfs_root() -> String {
    DEFAULT_SYSFS_ROOT.into()
}
fn default_object_path() -> String {
    DEFAULT_OBJECT_PATH.into()
}
fn default_duty_on() -> u8 {
    DEFAULT_DUTY_ON
}
fn default_period_ms() -> u32 {
    DEFAULT_PERIOD_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sysfs_root: default_sysfs_root(),
            object_path: default_object_path(),
            leds: Vec::new(),
            duty_on: DEFAULT_DUTY_ON,
            period_ms: DEFAULT_PERIOD_MS,
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `duty_on` is above 100.
    InvalidDutyOn(u8),
    /// `period_ms` is zero.
    ZeroPeriod,
    /// `object_path` is not an absolute object path.
    InvalidObjectPath(String),
    /// An entry of `leds` has no device component.
    MalformedLedName(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDutyOn(d) => write!(f, "Invalid duty_on: {d} (max 100)"),
            ValidationError::ZeroPeriod => write!(f, "period_ms must be non-zero"),
            ValidationError::InvalidObjectPath(p) => {
                write!(f, "Invalid object_path: {p:?} (must start with '/')")
            }
            ValidationError::MalformedLedName(n) => write!(f, "Malformed LED name: {n:?}"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sysfsled"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// The configured blink profile, if its values are in range.
    pub fn blink_profile(&self) -> crate::error::Result<BlinkProfile> {
        BlinkProfile::new(self.duty_on, self.period_ms)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.duty_on > 100 {
            errors.push(ValidationError::InvalidDutyOn(self.duty_on));
        }
        if self.period_ms == 0 {
            errors.push(ValidationError::ZeroPeriod);
        }
        if !self.object_path.starts_with('/') {
            errors.push(ValidationError::InvalidObjectPath(self.object_path.clone()));
        }
        for raw in &self.leds {
            if identity::LedName::new(raw, &self.object_path).is_err() {
                errors.push(ValidationError::MalformedLedName(raw.clone()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── defaults ──

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.sysfs_root, "/sys/class/leds");
        assert_eq!(c.object_path, "/xyz/openbmc_project/led/physical");
        assert!(c.leds.is_empty());
        assert_eq!(c.duty_on, 50);
        assert_eq!(c.period_ms, 1000);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c: Config = toml::from_str("leds = [\"group1:blue:power1\"]").unwrap();
        assert_eq!(c.leds, vec!["group1:blue:power1".to_string()]);
        assert_eq!(c.sysfs_root, "/sys/class/leds");
        assert_eq!(c.period_ms, 1000);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c.object_path, "/xyz/openbmc_project/led/physical");
        assert_eq!(c.duty_on, 50);
    }

    #[test]
    fn wrong_type_toml_is_error() {
        let result: std::result::Result<Config, _> = toml::from_str("period_ms = \"slow\"");
        assert!(result.is_err());
    }

    #[test]
    fn config_path_ends_with_toml() {
        if let Some(p) = Config::path() {
            assert!(p.ends_with("sysfsled/config.toml"));
        }
    }

    // ── blink_profile ──

    #[test]
    fn blink_profile_from_fields() {
        let c = Config {
            duty_on: 30,
            period_ms: 2000,
            ..Config::default()
        };
        assert_eq!(c.blink_profile().unwrap(), BlinkProfile::new(30, 2000).unwrap());
    }

    #[test]
    fn blink_profile_out_of_range_is_err() {
        let c = Config {
            period_ms: 0,
            ..Config::default()
        };
        assert!(c.blink_profile().is_err());
    }

    // ── validate ──

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_collects_multiple_errors() {
        let c = Config {
            object_path: "leds".into(),
            leds: vec!["group1".into(), "".into()],
            duty_on: 150,
            period_ms: 0,
            ..Config::default()
        };
        let errors = c.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidDutyOn(150),
                ValidationError::ZeroPeriod,
                ValidationError::InvalidObjectPath("leds".into()),
                ValidationError::MalformedLedName(String::new()),
            ]
        );
    }

    #[test]
    fn validation_error_display() {
        assert_eq!(
            ValidationError::InvalidDutyOn(101).to_string(),
            "Invalid duty_on: 101 (max 100)"
        );
        assert_eq!(
            ValidationError::MalformedLedName(":x".into()).to_string(),
            "Malformed LED name: \":x\""
        );
    }

    // ── save_to / load_from ──

    #[test]
    fn save_to_load_from_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            sysfs_root: "/tmp/leds".into(),
            object_path: "/test/led".into(),
            leds: vec!["group1:blue:power1".into(), "group2".into()],
            duty_on: 20,
            period_ms: 500,
        };
        config.save_to(&path).unwrap();

        let (loaded, warnings) = Config::load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(loaded.sysfs_root, config.sysfs_root);
        assert_eq!(loaded.object_path, config.object_path);
        assert_eq!(loaded.leds, config.leds);
        assert_eq!(loaded.duty_on, config.duty_on);
        assert_eq!(loaded.period_ms, config.period_ms);
    }

    #[test]
    fn save_to_includes_header_comment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::default().save_to(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# sysfsled configuration"));
    }

    #[test]
    fn save_to_cleans_up_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::default().save_to(&path).unwrap();
        assert!(!dir.path().join("config.toml.tmp").exists());
    }

    #[test]
    fn load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = Config::load_from(&dir.path().join("nonexistent.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.sysfs_root, "/sys/class/leds");
    }

    #[test]
    fn load_from_invalid_toml_returns_defaults_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is { not valid toml").unwrap();

        let (config, warnings) = Config::load_from(&path);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("config parse error"));
        assert_eq!(config.duty_on, 50);
    }
}

//! Bring-up configuration
//!
//! Built-in defaults reproduce the classic `slcan_attach` bring-up for an FTDI
//! dongle. A TOML file may override any subset of them, and a handful of
//! command-line flags override the file.

use crate::adapters::{get_adapter, AdapterProfile};
use crate::discovery::MatchRule;
use crate::error::BringupError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest `-s<N>` code accepted by `slcan_attach` (1 Mbit/s)
pub const MAX_BITRATE_CODE: u8 = 8;

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BringupConfig {
    pub device: DeviceSettings,
    pub helper: HelperSettings,
    pub interface: InterfaceSettings,
}

/// Where and how to look for the adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// sysfs TTY class directory
    pub tty_root: PathBuf,
    /// Directory holding the device nodes
    pub dev_root: PathBuf,
    /// Adapter profile name (see `adapters list`)
    pub adapter: String,
    /// Exact driver identity line, overrides the profile's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// TTY name prefix, overrides the profile's
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
    /// Use this port instead of scanning (e.g., "ttyUSB1" or "/dev/ttyUSB1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Continue with an empty device path when nothing matches
    pub allow_missing: bool,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            tty_root: PathBuf::from("/sys/class/tty"),
            dev_root: PathBuf::from("/dev"),
            adapter: "ftdi".to_string(),
            driver: None,
            name_prefix: None,
            port: None,
            allow_missing: false,
        }
    }
}

/// When to prefix privileged commands with `privilege_command`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    /// Only when not already running as root
    Auto,
    Always,
    Never,
}

/// The bridging helper and how it is (re)started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperSettings {
    /// `slcan_attach` binary, bare name or absolute path
    pub binary: String,
    /// CAN bitrate code passed as `-s<N>` (6 = 500 kbit/s)
    pub bitrate_code: u8,
    /// Detached screen session name
    pub session: String,
    /// Terminal multiplexer used to detach the helper
    pub multiplexer: String,
    pub privilege: Privilege,
    pub privilege_command: String,
    /// Kills every process with a given name
    pub kill_command: String,
}

impl Default for HelperSettings {
    fn default() -> Self {
        Self {
            binary: "slcan_attach".to_string(),
            bitrate_code: 6,
            session: "slcan".to_string(),
            multiplexer: "screen".to_string(),
            privilege: Privilege::Always,
            privilege_command: "sudo".to_string(),
            kill_command: "killall".to_string(),
        }
    }
}

/// The SocketCAN interface created by the helper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceSettings {
    pub name: String,
    /// sysfs net class directory, polled for the interface
    pub net_root: PathBuf,
    pub activate_command: String,
    pub wait_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// Extra pause after the interface appears
    pub settle_ms: u64,
}

impl Default for InterfaceSettings {
    fn default() -> Self {
        Self {
            name: "slcan0".to_string(),
            net_root: PathBuf::from("/sys/class/net"),
            activate_command: "ifconfig".to_string(),
            wait_timeout_ms: 3000,
            poll_interval_ms: 100,
            settle_ms: 0,
        }
    }
}

impl InterfaceSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Command-line flags that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub adapter: Option<String>,
    pub interface: Option<String>,
    pub bitrate_code: Option<u8>,
    pub binary: Option<String>,
    pub allow_missing: bool,
}

impl BringupConfig {
    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, BringupError> {
        let content = fs::read_to_string(path).map_err(|source| BringupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_content(&content, path)
    }

    /// Parse TOML content; `path` is only used in error messages
    pub fn parse_content(content: &str, path: &Path) -> Result<Self, BringupError> {
        let config: Self = toml::from_str(content).map_err(|source| BringupError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional file
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p).with_context(|| "Failed to load configuration"),
            None => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), BringupError> {
        if let Some(ref port) = overrides.port {
            self.device.port = Some(port.clone());
        }
        if let Some(ref adapter) = overrides.adapter {
            self.device.adapter = adapter.clone();
        }
        if let Some(ref interface) = overrides.interface {
            self.interface.name = interface.clone();
        }
        if let Some(code) = overrides.bitrate_code {
            self.helper.bitrate_code = code;
        }
        if let Some(ref binary) = overrides.binary {
            self.helper.binary = binary.clone();
        }
        if overrides.allow_missing {
            self.device.allow_missing = true;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), BringupError> {
        if self.helper.bitrate_code > MAX_BITRATE_CODE {
            return Err(BringupError::InvalidBitrateCode(self.helper.bitrate_code));
        }
        self.adapter()?;
        Ok(())
    }

    pub fn adapter(&self) -> Result<&'static AdapterProfile, BringupError> {
        get_adapter(&self.device.adapter)
            .ok_or_else(|| BringupError::UnknownAdapter(self.device.adapter.clone()))
    }

    /// The rule used to pick a TTY: profile values unless overridden
    pub fn match_rule(&self) -> Result<MatchRule, BringupError> {
        let adapter = self.adapter()?;
        Ok(MatchRule {
            name_prefix: self
                .device
                .name_prefix
                .clone()
                .unwrap_or_else(|| adapter.tty_prefix.clone()),
            driver: self
                .device
                .driver
                .clone()
                .unwrap_or_else(|| adapter.driver_identity()),
        })
    }

    /// Command to prepend to privileged invocations, if any
    pub fn privilege_prefix(&self) -> Option<&str> {
        let wanted = match self.helper.privilege {
            Privilege::Always => true,
            Privilege::Never => false,
            Privilege::Auto => !running_as_root(),
        };
        if wanted && !self.helper.privilege_command.is_empty() {
            Some(self.helper.privilege_command.as_str())
        } else {
            None
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration")
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = BringupConfig::default();
        assert_eq!(config.device.tty_root, PathBuf::from("/sys/class/tty"));
        assert_eq!(config.helper.binary, "slcan_attach");
        assert_eq!(config.helper.bitrate_code, 6);
        assert_eq!(config.interface.name, "slcan0");
        assert_eq!(config.privilege_prefix(), Some("sudo"));

        let rule = config.match_rule().unwrap();
        assert_eq!(rule.name_prefix, "ttyUSB");
        assert_eq!(rule.driver, "DRIVER=ftdi_sio");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let content = r#"
[device]
adapter = "pl2303"

[interface]
name = "slcan1"
wait_timeout_ms = 500
"#;
        let config = BringupConfig::parse_content(content, Path::new("test.toml")).unwrap();
        assert_eq!(config.match_rule().unwrap().driver, "DRIVER=pl2303");
        assert_eq!(config.interface.name, "slcan1");
        assert_eq!(config.interface.wait_timeout(), Duration::from_millis(500));
        assert_eq!(config.interface.activate_command, "ifconfig");
        assert_eq!(config.helper.session, "slcan");
    }

    #[test]
    fn test_driver_override_wins_over_profile() {
        let content = r#"
[device]
driver = "DRIVER=usb_serial_simple"
name_prefix = "ttyACM"
"#;
        let config = BringupConfig::parse_content(content, Path::new("test.toml")).unwrap();
        let rule = config.match_rule().unwrap();
        assert_eq!(rule.driver, "DRIVER=usb_serial_simple");
        assert_eq!(rule.name_prefix, "ttyACM");
    }

    #[test]
    fn test_rejects_bad_bitrate_and_adapter() {
        let err = BringupConfig::parse_content("[helper]\nbitrate_code = 9\n", Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, BringupError::InvalidBitrateCode(9)));

        let err = BringupConfig::parse_content("[device]\nadapter = \"nope\"\n", Path::new("x"))
            .unwrap_err();
        assert!(matches!(err, BringupError::UnknownAdapter(_)));

        let err = BringupConfig::parse_content("[device\n", Path::new("x")).unwrap_err();
        assert!(matches!(err, BringupError::ConfigParse { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut config = BringupConfig::default();
        config
            .apply_overrides(&Overrides {
                port: Some("ttyUSB3".to_string()),
                interface: Some("can7".to_string()),
                bitrate_code: Some(8),
                allow_missing: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.device.port.as_deref(), Some("ttyUSB3"));
        assert_eq!(config.interface.name, "can7");
        assert_eq!(config.helper.bitrate_code, 8);
        assert!(config.device.allow_missing);

        let err = config
            .apply_overrides(&Overrides {
                bitrate_code: Some(42),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, BringupError::InvalidBitrateCode(42)));
    }

    #[test]
    fn test_privilege_modes() {
        let mut config = BringupConfig::default();
        config.helper.privilege = Privilege::Never;
        assert_eq!(config.privilege_prefix(), None);

        config.helper.privilege = Privilege::Always;
        config.helper.privilege_command = "doas".to_string();
        assert_eq!(config.privilege_prefix(), Some("doas"));

        config.helper.privilege_command = String::new();
        assert_eq!(config.privilege_prefix(), None);
    }

    #[test]
    fn test_generated_config_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slcan.toml");
        let mut config = BringupConfig::default();
        config.device.port = Some("/dev/ttyUSB2".to_string());
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = BringupConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = BringupConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, BringupError::ConfigRead { .. }));
    }
}

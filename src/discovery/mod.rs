//! Serial device discovery
//!
//! This module provides:
//! - Enumeration of TTY entries with their driver identity (`SysfsTtySource`)
//! - The matching policy that picks the adapter (`MatchRule`, `find_device`)
//! - Resolution of the final device node, honoring an explicit port

pub mod candidate;
pub mod select;
pub mod sysfs;
#[cfg(feature = "serial")]
pub mod usb;

pub use candidate::TtyCandidate;
pub use select::{all_matches, find_device, MatchRule};
pub use sysfs::SysfsTtySource;

use crate::config::DeviceSettings;
use crate::error::BringupError;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Anything that can list TTY candidates in listing order
pub trait DeviceSource {
    fn candidates(&self) -> Result<Vec<TtyCandidate>, BringupError>;
}

/// How the device node was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOrigin {
    /// Given explicitly, discovery skipped
    Configured,
    /// First match of a scan; names of later matches that were passed over
    Discovered { passed_over: Vec<String> },
    /// Nothing matched and the caller allowed an empty device
    Missing,
}

/// The device node handed to the helper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDevice {
    /// TTY name, empty when missing
    pub name: String,
    /// Path passed to `slcan_attach -c`
    pub path: PathBuf,
    pub origin: DeviceOrigin,
}

impl ResolvedDevice {
    pub fn is_missing(&self) -> bool {
        self.origin == DeviceOrigin::Missing
    }
}

/// Pick the device node for the helper
///
/// An explicit port wins. Otherwise the first candidate matching `rule` is
/// used; further matches are logged and ignored. With no match this fails
/// unless `settings.allow_missing` is set, in which case the bare device
/// directory is returned.
pub fn locate_device(
    source: &dyn DeviceSource,
    rule: &MatchRule,
    settings: &DeviceSettings,
) -> Result<ResolvedDevice, BringupError> {
    if let Some(ref port) = settings.port {
        let path = port_path(port, &settings.dev_root);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        info!("using configured port {}", path.display());
        return Ok(ResolvedDevice {
            name,
            path,
            origin: DeviceOrigin::Configured,
        });
    }

    let candidates = source.candidates()?;
    let matches = all_matches(&candidates, rule);

    match matches.split_first() {
        Some((first, rest)) => {
            let passed_over: Vec<String> = rest.iter().map(|c| c.name.clone()).collect();
            if !passed_over.is_empty() {
                warn!(
                    "{} adapters match {}; using {}, ignoring {}",
                    matches.len(),
                    rule.driver,
                    first.name,
                    passed_over.join(", ")
                );
            }
            info!("found {} ({})", first.name, rule.driver);
            Ok(ResolvedDevice {
                name: first.name.clone(),
                path: first.device_path(&settings.dev_root),
                origin: DeviceOrigin::Discovered { passed_over },
            })
        }
        None if settings.allow_missing => {
            warn!(
                "no {}* device with {}; continuing without a device",
                rule.name_prefix, rule.driver
            );
            Ok(ResolvedDevice {
                name: String::new(),
                path: settings.dev_root.join(""),
                origin: DeviceOrigin::Missing,
            })
        }
        None => Err(BringupError::NoMatchingDevice {
            prefix: rule.name_prefix.clone(),
            driver: rule.driver.clone(),
            root: settings.tty_root.clone(),
        }),
    }
}

/// "ttyUSB1" -> /dev/ttyUSB1, absolute paths are kept
fn port_path(port: &str, dev_root: &Path) -> PathBuf {
    let p = Path::new(port);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        dev_root.join(p)
    }
}

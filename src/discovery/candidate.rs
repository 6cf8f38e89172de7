//! TTY candidates as seen under `/sys/class/tty`

use std::path::{Path, PathBuf};

/// One entry of the TTY class directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtyCandidate {
    /// Kernel-assigned name (e.g., "ttyUSB0")
    pub name: String,
    /// First line of `device/uevent`, `None` when the entry has no
    /// physical device or the file could not be read
    pub driver: Option<String>,
}

impl TtyCandidate {
    pub fn new(name: &str, driver: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            driver: driver.map(|d| d.to_string()),
        }
    }

    /// Device node for this TTY (e.g., /dev/ttyUSB0)
    pub fn device_path(&self, dev_root: &Path) -> PathBuf {
        dev_root.join(&self.name)
    }
}

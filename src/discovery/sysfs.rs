//! TTY enumeration from sysfs
//!
//! Every entry of `/sys/class/tty` is listed in directory order. Entries
//! backed by a real device carry `device/uevent`, whose first line names the
//! bound driver (`DRIVER=ftdi_sio`). Virtual consoles and legacy UARTs often
//! have no such file; they are listed with no driver.

use super::candidate::TtyCandidate;
use super::DeviceSource;
use crate::error::BringupError;
use log::debug;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Per-device metadata file, relative to the TTY entry
const UEVENT_FILE: &str = "device/uevent";

/// Reads candidates from a sysfs TTY class directory
#[derive(Debug, Clone)]
pub struct SysfsTtySource {
    root: PathBuf,
}

impl SysfsTtySource {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// First line of `<root>/<name>/device/uevent`, trimmed
    pub fn driver_identity(&self, name: &str) -> Option<String> {
        let path = self.root.join(name).join(UEVENT_FILE);
        match read_first_line(&path) {
            Ok(line) => Some(line),
            Err(e) => {
                debug!("{}: no driver identity ({})", name, e);
                None
            }
        }
    }
}

impl DeviceSource for SysfsTtySource {
    fn candidates(&self) -> Result<Vec<TtyCandidate>, BringupError> {
        let entries = fs::read_dir(&self.root).map_err(|source| BringupError::TtyDirUnreadable {
            path: self.root.clone(),
            source,
        })?;

        let mut candidates = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            let driver = self.driver_identity(&name);
            candidates.push(TtyCandidate { name, driver });
        }

        debug!(
            "{} TTY entries under {}",
            candidates.len(),
            self.root.display()
        );
        Ok(candidates)
    }
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{find_device, MatchRule};
    use tempfile::tempdir;

    fn add_tty(root: &Path, name: &str, uevent: Option<&str>) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = uevent {
            fs::create_dir_all(dir.join("device")).unwrap();
            fs::write(dir.join(UEVENT_FILE), content).unwrap();
        }
    }

    #[test]
    fn test_reads_first_line_only() {
        let dir = tempdir().unwrap();
        add_tty(
            dir.path(),
            "ttyUSB0",
            Some("DRIVER=ftdi_sio\nPRODUCT=403/6001/600\nINTERFACE=255/255/255\n"),
        );
        let source = SysfsTtySource::new(dir.path());
        assert_eq!(
            source.driver_identity("ttyUSB0").as_deref(),
            Some("DRIVER=ftdi_sio")
        );
    }

    #[test]
    fn test_missing_uevent_is_not_fatal() {
        let dir = tempdir().unwrap();
        add_tty(dir.path(), "ttyUSB0", Some("DRIVER=ftdi_sio\n"));
        add_tty(dir.path(), "ttyS0", None);

        let source = SysfsTtySource::new(dir.path());
        let candidates = source.candidates().unwrap();
        assert_eq!(candidates.len(), 2);

        let serial = candidates.iter().find(|c| c.name == "ttyS0").unwrap();
        assert_eq!(serial.driver, None);

        let rule = MatchRule::new("ttyUSB", "DRIVER=ftdi_sio");
        assert_eq!(find_device(&candidates, &rule).unwrap().name, "ttyUSB0");
    }

    #[test]
    fn test_unreadable_root() {
        let dir = tempdir().unwrap();
        let source = SysfsTtySource::new(&dir.path().join("missing"));
        let err = source.candidates().unwrap_err();
        assert!(matches!(err, BringupError::TtyDirUnreadable { .. }));
    }

    #[test]
    fn test_empty_uevent() {
        let dir = tempdir().unwrap();
        add_tty(dir.path(), "ttyUSB0", Some(""));
        let source = SysfsTtySource::new(dir.path());
        assert_eq!(source.driver_identity("ttyUSB0").as_deref(), Some(""));
    }
}

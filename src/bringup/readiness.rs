//! Waiting for the helper to create the network interface
//!
//! `slcan_attach` creates the interface asynchronously after `screen` has
//! returned. Instead of sleeping a fixed time, the net class directory is
//! polled: first until the old helper's interface is gone, then until the
//! new one shows up. Both waits are bounded by a timeout.

use log::debug;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Looks up network interfaces
pub trait InterfaceProbe {
    fn exists(&self, name: &str) -> bool;

    /// Kernel operational state ("up", "down", "unknown", ...)
    fn operstate(&self, name: &str) -> Option<String>;
}

/// Probe backed by `/sys/class/net`
#[derive(Debug, Clone)]
pub struct SysfsNetProbe {
    root: PathBuf,
}

impl SysfsNetProbe {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl InterfaceProbe for SysfsNetProbe {
    fn exists(&self, name: &str) -> bool {
        self.root.join(name).exists()
    }

    fn operstate(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(name).join("operstate"))
            .ok()
            .map(|s| s.trim().to_string())
    }
}

/// Result of waiting for the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Appeared { after: Duration },
    TimedOut { waited: Duration },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Appeared { .. })
    }
}

/// Result of waiting for the previous helper's interface to go away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Gone { after: Duration },
    StillPresent { waited: Duration },
}

impl Removal {
    pub fn is_gone(&self) -> bool {
        matches!(self, Removal::Gone { .. })
    }
}

/// Poll `probe` for `name` every `poll_interval` until `timeout`
///
/// The probe is checked at least once, so a zero timeout still detects an
/// interface that already exists.
pub fn wait_for_interface(
    probe: &dyn InterfaceProbe,
    name: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Readiness {
    match poll_until(|| probe.exists(name), timeout, poll_interval) {
        Ok(after) => {
            debug!("{} present after {:?}", name, after);
            Readiness::Appeared { after }
        }
        Err(waited) => Readiness::TimedOut { waited },
    }
}

/// Poll until `name` no longer exists
///
/// The old helper's interface can outlive `killall` for a moment; the new
/// one must not be confused with it.
pub fn wait_for_interface_removal(
    probe: &dyn InterfaceProbe,
    name: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Removal {
    match poll_until(|| !probe.exists(name), timeout, poll_interval) {
        Ok(after) => {
            debug!("{} absent after {:?}", name, after);
            Removal::Gone { after }
        }
        Err(waited) => Removal::StillPresent { waited },
    }
}

/// Ok(elapsed) once `done` holds, Err(elapsed) on timeout
fn poll_until<F>(mut done: F, timeout: Duration, poll_interval: Duration) -> Result<Duration, Duration>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    loop {
        if done() {
            return Ok(start.elapsed());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(elapsed);
        }
        thread::sleep(poll_interval.min(timeout - elapsed));
    }
}

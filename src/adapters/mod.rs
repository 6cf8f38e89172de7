//! USB-serial adapter profiles
//!
//! The bring-up picks its serial device by the kernel driver bound to it.
//! Each profile names that driver and the TTY prefix it registers.

pub mod builtin;
pub mod profile;

pub use builtin::{CH341_PROFILE, CP210X_PROFILE, FTDI_PROFILE, PL2303_PROFILE};
pub use profile::AdapterProfile;

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Registry of built-in adapter profiles
pub static ADAPTER_PROFILES: Lazy<HashMap<&'static str, &'static AdapterProfile>> =
    Lazy::new(|| {
        let mut m = HashMap::new();
        m.insert("ftdi", &*FTDI_PROFILE);
        m.insert("ftdi_sio", &*FTDI_PROFILE);
        m.insert("pl2303", &*PL2303_PROFILE);
        m.insert("prolific", &*PL2303_PROFILE);
        m.insert("cp210x", &*CP210X_PROFILE);
        m.insert("ch341", &*CH341_PROFILE);
        m.insert("ch340", &*CH341_PROFILE);
        m
    });

/// Get an adapter profile by name or alias
pub fn get_adapter(name: &str) -> Option<&'static AdapterProfile> {
    ADAPTER_PROFILES.get(name.to_lowercase().as_str()).copied()
}

/// Canonical profile names (aliases excluded)
pub fn adapter_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = vec!["ftdi", "pl2303", "cp210x", "ch341"];
    names.sort();
    names
}

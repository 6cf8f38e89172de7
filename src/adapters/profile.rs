//! Adapter profile definitions
//!
//! An adapter profile describes how a USB-serial CAN adapter shows up under
//! `/sys/class/tty`: which TTY names to look at and which driver binds it.

/// Known USB-serial adapter
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    /// Short identifier (e.g., "ftdi")
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Adapter description
    pub description: String,
    /// Kernel driver bound to the USB interface
    pub kernel_driver: String,
    /// TTY name prefix the driver registers (e.g., "ttyUSB")
    pub tty_prefix: String,
    /// USB vendor IDs, used for display only
    pub usb_vendor_ids: Vec<u16>,
}

impl AdapterProfile {
    /// Create a profile for a driver that registers `ttyUSB*` nodes
    pub fn new(id: &str, name: &str, kernel_driver: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            kernel_driver: kernel_driver.to_string(),
            tty_prefix: "ttyUSB".to_string(),
            usb_vendor_ids: Vec::new(),
        }
    }

    /// The first line of `device/uevent` for a TTY bound to this driver
    pub fn driver_identity(&self) -> String {
        format!("DRIVER={}", self.kernel_driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_identity() {
        let profile = AdapterProfile::new("ftdi", "FTDI", "ftdi_sio");
        assert_eq!(profile.driver_identity(), "DRIVER=ftdi_sio");
        assert_eq!(profile.tty_prefix, "ttyUSB");
    }
}

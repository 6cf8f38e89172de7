//! Built-in adapter profiles

use super::profile::AdapterProfile;
use once_cell::sync::Lazy;

/// FTDI FT232/FT2232 based adapters (CANUSB, USBtin clones, ...)
pub static FTDI_PROFILE: Lazy<AdapterProfile> = Lazy::new(|| AdapterProfile {
    description: "FTDI USB-serial bridge, the usual SLCAN dongle".to_string(),
    usb_vendor_ids: vec![0x0403],
    ..AdapterProfile::new("ftdi", "FTDI", "ftdi_sio")
});

/// Prolific PL2303 adapters
pub static PL2303_PROFILE: Lazy<AdapterProfile> = Lazy::new(|| AdapterProfile {
    description: "Prolific PL2303 USB-serial bridge".to_string(),
    usb_vendor_ids: vec![0x067b],
    ..AdapterProfile::new("pl2303", "Prolific PL2303", "pl2303")
});

/// Silicon Labs CP210x adapters
pub static CP210X_PROFILE: Lazy<AdapterProfile> = Lazy::new(|| AdapterProfile {
    description: "Silicon Labs CP210x USB-serial bridge".to_string(),
    usb_vendor_ids: vec![0x10c4],
    ..AdapterProfile::new("cp210x", "Silicon Labs CP210x", "cp210x")
});

/// WCH CH340/CH341 adapters
pub static CH341_PROFILE: Lazy<AdapterProfile> = Lazy::new(|| AdapterProfile {
    description: "WCH CH340/CH341 USB-serial bridge".to_string(),
    usb_vendor_ids: vec![0x1a86],
    ..AdapterProfile::new("ch341", "WCH CH340/CH341", "ch341")
});

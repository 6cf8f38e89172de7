//! USB details for a device node, via the serialport enumerator

use anyhow::{Context, Result};

/// USB identity of a serial port
#[derive(Debug, Clone)]
pub struct UsbDetails {
    pub vid: u16,
    pub pid: u16,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

/// Look up the USB identity of `/dev/<name>`, if it is a USB port
pub fn usb_details(device_path: &str) -> Result<Option<UsbDetails>> {
    let ports =
        serialport::available_ports().with_context(|| "Failed to enumerate serial ports")?;

    Ok(ports
        .into_iter()
        .find(|p| p.port_name == device_path)
        .and_then(|p| match p.port_type {
            serialport::SerialPortType::UsbPort(info) => Some(UsbDetails {
                vid: info.vid,
                pid: info.pid,
                manufacturer: info.manufacturer,
                product: info.product,
                serial_number: info.serial_number,
            }),
            _ => None,
        }))
}

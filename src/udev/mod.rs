use std::{error::Error, ffi::OsStr};

use udev::Enumerator;

use crate::acpi::AcpiDevice;

const ACPI_SUBSYSTEM: &str = "acpi";

/// Returns all ACPI devices with the given hardware ID (e.g. "PNP0C32")
pub fn discover_acpi_devices(hid: &str) -> Result<Vec<AcpiDevice>, Box<dyn Error + Send + Sync>> {
    let mut enumerator = Enumerator::new()?;
    enumerator.match_subsystem(ACPI_SUBSYSTEM)?;
    enumerator.match_attribute("hid", hid)?;

    log::debug!("Started udev {ACPI_SUBSYSTEM} enumerator for {hid}.");

    Ok(enumerator
        .scan_devices()?
        .map(|device| to_acpi_device(&device))
        .collect())
}

/// Build an [AcpiDevice] from the given udev device. The bus ID is the
/// device's sysname (e.g. "PNP0C32:00").
fn to_acpi_device(device: &udev::Device) -> AcpiDevice {
    let hid = device
        .attribute_value("hid")
        .unwrap_or(OsStr::new(""))
        .to_string_lossy()
        .to_string();
    let bus_id = device.sysname().to_string_lossy().to_string();
    let syspath = device.syspath().to_string_lossy().to_string();
    log::trace!("Found ACPI device {bus_id} ({hid}) at {syspath}");

    AcpiDevice::new(hid.as_str(), bus_id.as_str(), syspath.as_str())
}

use std::error::Error;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::{
    acpi::table_entries,
    drivers::odde::driver::{ACPI_BUTTON_DEVICE_NAME, ACPI_ODDE_DRIVER_INFO},
    drivers::odde::phys::format_phys,
    udev::discover_acpi_devices,
};

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Bus Id")]
    bus_id: String,
    #[tabled(rename = "Phys")]
    phys: String,
    #[tabled(rename = "Path")]
    path: String,
}

#[derive(Tabled)]
struct IdRow {
    #[tabled(rename = "Hardware Id")]
    hid: String,
    #[tabled(rename = "Driver")]
    driver: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// List every ACPI device matching the eject button identity table
pub fn handle_devices() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut rows = Vec::new();
    for id in table_entries(ACPI_ODDE_DRIVER_INFO.ids) {
        for device in discover_acpi_devices(id.hid)? {
            rows.push(DeviceRow {
                bus_id: device.bus_id().to_string(),
                phys: format_phys(device.hid()).to_string(),
                path: device.syspath().to_string(),
            });
        }
    }
    let count = rows.len();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header(ACPI_BUTTON_DEVICE_NAME));
    println!("{table}");
    println!("Found {count} device(s)");

    Ok(())
}

/// Print the identity table of the eject button driver
pub fn handle_ids() {
    let info = &ACPI_ODDE_DRIVER_INFO;
    let rows: Vec<IdRow> = table_entries(info.ids)
        .map(|id| IdRow {
            hid: id.hid.to_string(),
            driver: info.name.to_string(),
            class: info.class.to_string(),
            description: info.description.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Supported Devices"));
    println!("{table}");
}

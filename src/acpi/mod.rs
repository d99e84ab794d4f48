pub mod bus;
pub mod event;
pub mod registry;

#[cfg(test)]
pub mod event_test;

use std::any::Any;

use crate::drivers::DriverError;

/// Entry in a driver's hardware ID table. Tables end with an empty-string
/// sentinel entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiDeviceId {
    pub hid: &'static str,
}

impl AcpiDeviceId {
    pub const fn new(hid: &'static str) -> Self {
        Self { hid }
    }

    /// Returns true if this is the table terminator
    pub fn is_sentinel(&self) -> bool {
        self.hid.is_empty()
    }
}

/// Returns the entries of the given ID table that come before the sentinel.
pub fn table_entries(ids: &'static [AcpiDeviceId]) -> impl Iterator<Item = &'static AcpiDeviceId> {
    ids.iter().take_while(|id| !id.is_sentinel())
}

/// Static metadata describing a driver
#[derive(Debug, Clone, Copy)]
pub struct DriverInfo {
    pub name: &'static str,
    pub class: &'static str,
    pub ids: &'static [AcpiDeviceId],
    pub author: &'static str,
    pub description: &'static str,
    pub license: &'static str,
}

impl DriverInfo {
    /// Returns true if the given hardware ID appears in this driver's ID table
    pub fn matches(&self, hid: &str) -> bool {
        !hid.is_empty() && table_entries(self.ids).any(|id| id.hid == hid)
    }
}

/// An ACPI device discovered by the bus. Drivers store their per-device
/// state in the `driver_data` slot during `add` and take it back out in
/// `remove`.
#[derive(Debug, Default)]
pub struct AcpiDevice {
    hid: String,
    bus_id: String,
    syspath: String,
    /// Human readable device name, written by the bound driver
    pub device_name: String,
    /// Device class string, written by the bound driver
    pub device_class: String,
    driver_data: Option<Box<dyn Any + Send>>,
}

impl AcpiDevice {
    pub fn new(hid: &str, bus_id: &str, syspath: &str) -> Self {
        Self {
            hid: hid.to_string(),
            bus_id: bus_id.to_string(),
            syspath: syspath.to_string(),
            ..Default::default()
        }
    }

    /// Hardware ID of the device (e.g. "PNP0C32")
    pub fn hid(&self) -> &str {
        self.hid.as_str()
    }

    /// Instance name of the device on the ACPI bus (e.g. "PNP0C32:00")
    pub fn bus_id(&self) -> &str {
        self.bus_id.as_str()
    }

    /// Sysfs path of the device
    pub fn syspath(&self) -> &str {
        self.syspath.as_str()
    }

    /// Returns true if a driver has attached state to this device
    pub fn has_driver_data(&self) -> bool {
        self.driver_data.is_some()
    }

    pub fn set_driver_data<T: Any + Send>(&mut self, data: T) {
        self.driver_data = Some(Box::new(data));
    }

    pub fn driver_data_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.driver_data.as_mut()?.downcast_mut::<T>()
    }

    /// Removes the driver state from this device. The slot is left empty if
    /// the stored state is not a `T`.
    pub fn take_driver_data<T: Any + Send>(&mut self) -> Option<T> {
        let data = self.driver_data.take()?;
        match data.downcast::<T>() {
            Ok(data) => Some(*data),
            Err(_) => None,
        }
    }
}

/// Callbacks invoked by the [bus::AcpiBus] for devices matching the
/// driver's ID table.
pub trait AcpiDriver: Send + Sync {
    fn info(&self) -> &DriverInfo;

    /// Bind to a freshly discovered device. On error the device must be left
    /// exactly as it was passed in.
    fn add(&self, device: &mut AcpiDevice) -> Result<(), DriverError>;

    /// Unbind from a device previously bound with [AcpiDriver::add].
    fn remove(&self, device: &mut AcpiDevice) -> Result<(), DriverError>;

    /// Handle a firmware notification for a bound device.
    fn notify(&self, device: &mut AcpiDevice, event: u32);
}

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::drivers::DriverError;

use super::{registry::DriverRegistry, AcpiDevice, AcpiDriver};

#[derive(Error, Debug)]
pub enum BusError {
    #[error("device '{0}' is already bound")]
    AlreadyBound(String),
    #[error("driver failed to bind: {0}")]
    Driver(#[from] DriverError),
}

/// A device together with the driver it is bound to
struct BoundDevice {
    device: AcpiDevice,
    driver: Arc<dyn AcpiDriver>,
}

/// Routes bind, notify and unbind callbacks between discovered devices and
/// registered drivers. Callers are expected to serialize access; the bus is
/// owned by a single task.
pub struct AcpiBus {
    registry: DriverRegistry,
    devices: HashMap<String, BoundDevice>,
}

impl AcpiBus {
    pub fn new(registry: DriverRegistry) -> Self {
        Self {
            registry,
            devices: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// Bind the given device to a matching driver. Returns false if no
    /// registered driver supports the device.
    pub fn attach(&mut self, mut device: AcpiDevice) -> Result<bool, BusError> {
        let bus_id = device.bus_id().to_string();
        if self.devices.contains_key(&bus_id) {
            return Err(BusError::AlreadyBound(bus_id));
        }
        let Some(driver) = self.registry.match_device(device.hid()) else {
            log::debug!("No driver found for {bus_id} ({})", device.hid());
            return Ok(false);
        };

        log::debug!("Binding {bus_id} to driver '{}'", driver.info().name);
        driver.add(&mut device)?;
        self.devices.insert(bus_id, BoundDevice { device, driver });

        Ok(true)
    }

    /// Deliver a firmware notification to the driver bound to the given
    /// device. Returns false if the device is not bound.
    pub fn notify(&mut self, bus_id: &str, event: u32) -> bool {
        let Some(bound) = self.devices.get_mut(bus_id) else {
            log::debug!("Ignoring event 0x{event:x} for unbound device {bus_id}");
            return false;
        };
        bound.driver.notify(&mut bound.device, event);
        true
    }

    /// Unbind the given device. Returns false if the device is not bound.
    pub fn detach(&mut self, bus_id: &str) -> bool {
        let Some(mut bound) = self.devices.remove(bus_id) else {
            return false;
        };
        log::debug!("Unbinding {bus_id} from driver '{}'", bound.driver.info().name);
        if let Err(e) = bound.driver.remove(&mut bound.device) {
            log::error!("Failed to unbind {bus_id}: {e}");
        }
        true
    }

    /// Unbind every bound device
    pub fn detach_all(&mut self) {
        for bus_id in self.bound_devices() {
            self.detach(bus_id.as_str());
        }
    }

    /// Returns the bus IDs of all bound devices, sorted
    pub fn bound_devices(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.devices.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_bound(&self, bus_id: &str) -> bool {
        self.devices.contains_key(bus_id)
    }
}

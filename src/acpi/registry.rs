use std::sync::Arc;

use thiserror::Error;

use super::{table_entries, AcpiDriver};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("driver '{0}' is already registered")]
    Duplicate(String),
    #[error("driver '{0}' has no hardware ids")]
    EmptyIdTable(String),
}

/// Set of drivers the bus can bind devices to. Drivers are added explicitly
/// at startup with [DriverRegistry::register].
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<Arc<dyn AcpiDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the given driver
    pub fn register(&mut self, driver: Arc<dyn AcpiDriver>) -> Result<(), RegistryError> {
        let info = driver.info();
        if table_entries(info.ids).next().is_none() {
            return Err(RegistryError::EmptyIdTable(info.name.to_string()));
        }
        if self.drivers.iter().any(|d| d.info().name == info.name) {
            return Err(RegistryError::Duplicate(info.name.to_string()));
        }

        let ids: Vec<&str> = table_entries(info.ids).map(|id| id.hid).collect();
        log::debug!("Registered driver '{}' for {ids:?}", info.name);
        self.drivers.push(driver);

        Ok(())
    }

    /// Returns the first registered driver whose ID table contains the given
    /// hardware ID.
    pub fn match_device(&self, hid: &str) -> Option<Arc<dyn AcpiDriver>> {
        self.drivers
            .iter()
            .find(|driver| driver.info().matches(hid))
            .cloned()
    }

    pub fn drivers(&self) -> &[Arc<dyn AcpiDriver>] {
        self.drivers.as_slice()
    }
}

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use evdev::{BusType, InputId, KeyCode};

use crate::{
    acpi::{
        event::{normalize, AcpiBusEvent, EventBroadcaster, ACPI_BUTTON_NOTIFY_STATUS},
        AcpiDevice, AcpiDeviceId, AcpiDriver, DriverInfo,
    },
    drivers::DriverError,
    input::{InputDevice, InputSubsystem},
};

use super::phys::{format_phys, PhysPath};

pub const ACPI_BUTTON_CLASS: &str = "fujitsu";
pub const ACPI_BUTTON_SUBCLASS: &str = "odde";
pub const ACPI_BUTTON_HID: &str = "PNP0C32";
pub const ACPI_BUTTON_DEVICE_NAME: &str = "Optical Disc Drive Eject Button";

/// Product ID reported by the virtual input device
pub const PRODUCT_ID: u16 = 0x0001;
/// Key emitted when the button is pushed
pub const EJECT_KEY: KeyCode = KeyCode::KEY_EJECTCD;
/// Default number of buttons the driver can bind at once
pub const DEFAULT_MAX_BUTTONS: usize = 4;

/// Hardware ID's handled by this driver
pub static ACPI_ODDE_DEVICE_IDS: [AcpiDeviceId; 2] = [
    AcpiDeviceId::new(ACPI_BUTTON_HID),
    AcpiDeviceId::new(""),
];

pub static ACPI_ODDE_DRIVER_INFO: DriverInfo = DriverInfo {
    name: "odde",
    class: ACPI_BUTTON_CLASS,
    ids: &ACPI_ODDE_DEVICE_IDS,
    author: "Stanislaw Kardach",
    description: "Fujitsu Optical Disc Drive Eject Button Driver",
    license: "GPL",
};

/// Returns the device class string written to bound devices ("fujitsu/odde")
pub fn device_class() -> String {
    format!("{ACPI_BUTTON_CLASS}/{ACPI_BUTTON_SUBCLASS}")
}

/// Releases a controller slot back to its driver when dropped
#[derive(Debug)]
struct ControllerSlot {
    count: Arc<AtomicUsize>,
}

impl Drop for ControllerSlot {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Per-device state of a bound eject button
#[derive(Debug)]
pub struct ButtonController {
    input: Box<dyn InputDevice>,
    phys: PhysPath,
    pushed: u32,
    _slot: ControllerSlot,
}

impl ButtonController {
    /// Physical path of the input device
    pub fn phys(&self) -> &str {
        self.phys.as_str()
    }

    /// Number of button pushes seen since the device was bound
    pub fn pushed(&self) -> u32 {
        self.pushed
    }

    #[cfg(test)]
    pub(crate) fn set_pushed(&mut self, pushed: u32) {
        self.pushed = pushed;
    }

    /// Emit a full press and release of the eject key and count it. Returns
    /// the updated push count.
    fn push(&mut self) -> u32 {
        self.input.report_key(EJECT_KEY, 1);
        self.input.sync();
        self.input.report_key(EJECT_KEY, 0);
        self.input.sync();

        self.pushed = self.pushed.wrapping_add(1);
        self.pushed
    }
}

/// Driver for the ACPI optical disc drive eject button found on Fujitsu
/// laptops. Each pushed notification is translated into a KEY_EJECTCD press
/// and release on a virtual input device and republished on the event
/// broadcaster.
pub struct OddeDriver {
    input: Arc<dyn InputSubsystem>,
    broadcaster: Arc<dyn EventBroadcaster>,
    max_buttons: usize,
    buttons: Arc<AtomicUsize>,
}

impl OddeDriver {
    pub fn new(input: Arc<dyn InputSubsystem>, broadcaster: Arc<dyn EventBroadcaster>) -> Self {
        Self::with_capacity(input, broadcaster, DEFAULT_MAX_BUTTONS)
    }

    /// Create a driver that can hold state for at most `max_buttons` bound
    /// devices at once.
    pub fn with_capacity(
        input: Arc<dyn InputSubsystem>,
        broadcaster: Arc<dyn EventBroadcaster>,
        max_buttons: usize,
    ) -> Self {
        Self {
            input,
            broadcaster,
            max_buttons,
            buttons: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of button controllers currently allocated
    pub fn live_controllers(&self) -> usize {
        self.buttons.load(Ordering::Acquire)
    }

    fn reserve_slot(&self) -> Option<ControllerSlot> {
        let max = self.max_buttons;
        self.buttons
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < max).then_some(count + 1)
            })
            .ok()?;
        Some(ControllerSlot {
            count: self.buttons.clone(),
        })
    }
}

impl AcpiDriver for OddeDriver {
    fn info(&self) -> &DriverInfo {
        &ACPI_ODDE_DRIVER_INFO
    }

    fn add(&self, device: &mut AcpiDevice) -> Result<(), DriverError> {
        let Some(slot) = self.reserve_slot() else {
            log::warn!("No room for button state of {}", device.bus_id());
            return Err(DriverError::OutOfMemory);
        };

        // From here on, returning early drops `slot` and `input`, which
        // releases everything allocated so far.
        let mut input = match self.input.allocate_device() {
            Ok(input) => input,
            Err(e) => {
                log::warn!("Unable to allocate input device for {}: {e}", device.bus_id());
                return Err(DriverError::OutOfMemory);
            }
        };

        let phys = format_phys(device.hid());

        input.set_name(ACPI_BUTTON_DEVICE_NAME);
        input.set_phys(phys.as_str());
        input.set_id(InputId::new(BusType::BUS_HOST, 0, PRODUCT_ID, 0));
        input.set_parent(device.syspath());
        input.set_capability(EJECT_KEY);

        input.register()?;

        device.device_name = ACPI_BUTTON_DEVICE_NAME.to_string();
        device.device_class = device_class();
        device.set_driver_data(ButtonController {
            input,
            phys,
            pushed: 0,
            _slot: slot,
        });

        log::info!("{} [{}]", device.device_name, device.bus_id());
        Ok(())
    }

    fn remove(&self, device: &mut AcpiDevice) -> Result<(), DriverError> {
        let Some(button) = device.take_driver_data::<ButtonController>() else {
            unreachable!("odde: {} was removed without being bound", device.bus_id());
        };

        let ButtonController { input, .. } = button;
        input.unregister();
        log::debug!("Released eject button {}", device.bus_id());

        Ok(())
    }

    fn notify(&self, device: &mut AcpiDevice, event: u32) {
        let normalized = normalize(event);
        match normalized {
            ACPI_BUTTON_NOTIFY_STATUS => {
                let device_class = device.device_class.clone();
                let bus_id = device.bus_id().to_string();
                let Some(button) = device.driver_data_mut::<ButtonController>() else {
                    log::error!("Got event 0x{event:x} for {bus_id} without button state");
                    return;
                };

                let pushed = button.push();
                log::debug!("Eject button {bus_id} pushed ({pushed})");

                self.broadcaster.send(AcpiBusEvent {
                    device_class,
                    bus_id,
                    event_type: normalized,
                    data: pushed,
                });
            }
            _ => {
                log::info!("{}: Unsupported event [0x{event:x}]", device.bus_id());
            }
        }
    }
}

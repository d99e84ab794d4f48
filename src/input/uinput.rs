use std::ffi::CString;

use evdev::{uinput::VirtualDevice, AttributeSet, EventType, InputEvent, InputId, KeyCode};

use super::{InputDevice, InputError, InputSubsystem};

/// [InputSubsystem] backed by the kernel's uinput module
#[derive(Debug, Default)]
pub struct UinputSubsystem {}

impl UinputSubsystem {
    pub fn new() -> Self {
        Self {}
    }
}

impl InputSubsystem for UinputSubsystem {
    fn allocate_device(&self) -> Result<Box<dyn InputDevice>, InputError> {
        Ok(Box::new(UinputDevice::new()))
    }
}

/// A virtual input device created through /dev/uinput. Configuration is
/// buffered until [InputDevice::register] builds the device.
#[derive(Debug)]
pub struct UinputDevice {
    name: String,
    phys: String,
    id: InputId,
    parent: String,
    keys: AttributeSet<KeyCode>,
    device: Option<VirtualDevice>,
    pending: Vec<InputEvent>,
}

impl UinputDevice {
    fn new() -> Self {
        Self {
            name: String::new(),
            phys: String::new(),
            id: InputId::new(evdev::BusType::BUS_VIRTUAL, 0, 0, 0),
            parent: String::new(),
            keys: AttributeSet::new(),
            device: None,
            pending: Vec::new(),
        }
    }

    /// Create the virtual device
    fn create_virtual_device(&self) -> Result<VirtualDevice, InputError> {
        let phys = CString::new(self.phys.as_str())
            .map_err(|e| InputError::Rejected(format!("invalid phys: {e}")))?;
        let device = VirtualDevice::builder()?
            .name(self.name.as_str())
            .input_id(self.id.clone())
            .with_phys(&phys)?
            .with_keys(&self.keys)?
            .build()?;

        Ok(device)
    }
}

impl InputDevice for UinputDevice {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_phys(&mut self, phys: &str) {
        self.phys = phys.to_string();
    }

    fn set_id(&mut self, id: InputId) {
        self.id = id;
    }

    fn set_parent(&mut self, parent: &str) {
        self.parent = parent.to_string();
    }

    fn set_capability(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    fn register(&mut self) -> Result<(), InputError> {
        log::debug!("Creating virtual input device '{}'", self.name);
        let mut device = self.create_virtual_device()?;
        // uinput devices cannot be reparented, the parent is informational
        match device.get_syspath() {
            Ok(path) => log::debug!("Created {path:?} (parent: {})", self.parent),
            Err(e) => log::debug!("Unable to get syspath for '{}': {e}", self.name),
        }
        self.device = Some(device);

        Ok(())
    }

    fn report_key(&mut self, key: KeyCode, value: i32) {
        let event = InputEvent::new(EventType::KEY.0, key.0, value);
        self.pending.push(event);
    }

    fn sync(&mut self) {
        let Some(device) = self.device.as_mut() else {
            log::warn!("Dropping events for unregistered device '{}'", self.name);
            self.pending.clear();
            return;
        };

        // Emitting writes a SYN_REPORT after the events
        if let Err(e) = device.emit(self.pending.as_slice()) {
            log::error!("Failed to emit events on '{}': {e}", self.name);
        }
        self.pending.clear();
    }

    fn unregister(self: Box<Self>) {
        log::debug!("Destroying virtual input device '{}'", self.name);
        // Closing the uinput fd destroys the device
        drop(self);
    }
}

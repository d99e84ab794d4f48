use std::sync::{Arc, Mutex, MutexGuard};

use evdev::{InputId, KeyCode};

use super::{InputDevice, InputError, InputSubsystem};

/// Something that happened on a [MemoryDevice]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRecord {
    Registered { device: usize },
    Key { device: usize, key: KeyCode, value: i32 },
    Sync { device: usize },
    Unregistered { device: usize },
}

/// Configuration of a device created through a [MemoryInput]
#[derive(Debug, Clone)]
pub struct MemoryDeviceInfo {
    pub name: String,
    pub phys: String,
    pub id: InputId,
    pub parent: String,
    pub keys: Vec<KeyCode>,
    pub registered: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    devices: Vec<MemoryDeviceInfo>,
    records: Vec<InputRecord>,
}

/// [InputSubsystem] that keeps devices and events in memory instead of
/// creating them in the kernel. Used for dry runs where uinput is not
/// available.
#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns every device ever allocated, in allocation order
    pub fn devices(&self) -> Vec<MemoryDeviceInfo> {
        self.lock().devices.clone()
    }

    /// Returns the devices that are currently registered
    pub fn registered_devices(&self) -> Vec<MemoryDeviceInfo> {
        self.lock()
            .devices
            .iter()
            .filter(|device| device.registered)
            .cloned()
            .collect()
    }

    /// Returns everything recorded so far, in order
    pub fn records(&self) -> Vec<InputRecord> {
        self.lock().records.clone()
    }

    /// Returns only key and sync records
    pub fn events(&self) -> Vec<InputRecord> {
        self.lock()
            .records
            .iter()
            .filter(|record| matches!(record, InputRecord::Key { .. } | InputRecord::Sync { .. }))
            .cloned()
            .collect()
    }
}

impl InputSubsystem for MemoryInput {
    fn allocate_device(&self) -> Result<Box<dyn InputDevice>, InputError> {
        let mut state = self.lock();
        let index = state.devices.len();
        state.devices.push(MemoryDeviceInfo {
            name: String::new(),
            phys: String::new(),
            id: InputId::new(evdev::BusType::BUS_VIRTUAL, 0, 0, 0),
            parent: String::new(),
            keys: Vec::new(),
            registered: false,
        });

        Ok(Box::new(MemoryDevice {
            index,
            input: self.clone(),
        }))
    }
}

/// A virtual input device owned by a [MemoryInput]
#[derive(Debug)]
pub struct MemoryDevice {
    index: usize,
    input: MemoryInput,
}

impl MemoryDevice {
    fn update<F: FnOnce(&mut MemoryDeviceInfo)>(&self, f: F) {
        if let Some(info) = self.input.lock().devices.get_mut(self.index) {
            f(info);
        }
    }

    fn record(&self, record: InputRecord) {
        log::trace!("Memory input: {record:?}");
        self.input.lock().records.push(record);
    }
}

impl InputDevice for MemoryDevice {
    fn set_name(&mut self, name: &str) {
        self.update(|info| info.name = name.to_string());
    }

    fn set_phys(&mut self, phys: &str) {
        self.update(|info| info.phys = phys.to_string());
    }

    fn set_id(&mut self, id: InputId) {
        self.update(|info| info.id = id);
    }

    fn set_parent(&mut self, parent: &str) {
        self.update(|info| info.parent = parent.to_string());
    }

    fn set_capability(&mut self, key: KeyCode) {
        self.update(|info| {
            if !info.keys.contains(&key) {
                info.keys.push(key);
            }
        });
    }

    fn register(&mut self) -> Result<(), InputError> {
        self.update(|info| info.registered = true);
        self.record(InputRecord::Registered { device: self.index });
        Ok(())
    }

    fn report_key(&mut self, key: KeyCode, value: i32) {
        self.record(InputRecord::Key {
            device: self.index,
            key,
            value,
        });
    }

    fn sync(&mut self) {
        self.record(InputRecord::Sync { device: self.index });
    }

    fn unregister(self: Box<Self>) {
        self.update(|info| info.registered = false);
        self.record(InputRecord::Unregistered { device: self.index });
    }
}

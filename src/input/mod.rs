pub mod memory;
pub mod uinput;

use std::{fmt::Debug, io};

use evdev::{InputId, KeyCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("input device error: {0}")]
    Io(#[from] io::Error),
    #[error("device rejected: {0}")]
    Rejected(String),
}

impl InputError {
    /// Returns the OS error code for this error, if there is one
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            InputError::OutOfMemory => Some(nix::errno::Errno::ENOMEM as i32),
            InputError::Io(e) => e.raw_os_error(),
            InputError::Rejected(_) => None,
        }
    }
}

/// The input subsystem hands out unregistered virtual input devices
pub trait InputSubsystem: Send + Sync {
    fn allocate_device(&self) -> Result<Box<dyn InputDevice>, InputError>;
}

/// A virtual input device. Devices are configured while unregistered, then
/// [InputDevice::register]ed, after which they can report events until
/// [InputDevice::unregister] consumes them. Dropping an unregistered device
/// frees it.
pub trait InputDevice: Send + Debug {
    fn set_name(&mut self, name: &str);
    fn set_phys(&mut self, phys: &str);
    fn set_id(&mut self, id: InputId);
    fn set_parent(&mut self, parent: &str);
    /// Declare that the device can emit the given key
    fn set_capability(&mut self, key: KeyCode);
    fn register(&mut self) -> Result<(), InputError>;
    fn report_key(&mut self, key: KeyCode, value: i32);
    /// Flush reported events as one complete input frame
    fn sync(&mut self);
    fn unregister(self: Box<Self>);
}

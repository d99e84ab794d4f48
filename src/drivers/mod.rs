pub mod odde;

use nix::errno::Errno;
use thiserror::Error;

use crate::input::InputError;

/// Errors a driver can return while binding to a device
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("out of memory")]
    OutOfMemory,
    #[error("failed to register input device: {0}")]
    Registration(#[from] InputError),
}

impl DriverError {
    /// Returns the negative errno equivalent of this error
    pub fn errno(&self) -> i32 {
        match self {
            DriverError::OutOfMemory => -(Errno::ENOMEM as i32),
            DriverError::Registration(e) => -e.raw_os_error().unwrap_or(Errno::EIO as i32),
        }
    }
}

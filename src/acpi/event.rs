use std::{fmt::Display, str::FromStr};

use thiserror::Error;
use tokio::sync::broadcast;

/// Notification code for device status changes (button pressed)
pub const ACPI_BUTTON_NOTIFY_STATUS: u32 = 0x80;
/// Notification code used for fixed hardware buttons
pub const ACPI_FIXED_HARDWARE_EVENT: u32 = 0x100;

/// Maps aliased notification codes onto the code they are handled as.
pub fn normalize(event: u32) -> u32 {
    match event {
        ACPI_FIXED_HARDWARE_EVENT => ACPI_BUTTON_NOTIFY_STATUS,
        _ => event,
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("invalid hex value '{0}'")]
    InvalidHex(String),
}

/// A firmware event as published on the acpid socket, e.g.
/// `button/power PBTN 00000080 00000001`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcpiEvent {
    pub device_class: String,
    pub bus_id: String,
    pub event_type: u32,
    pub data: u32,
}

impl FromStr for AcpiEvent {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let device_class = parts.next().ok_or(ParseError::MissingField("class"))?;
        let bus_id = parts.next().ok_or(ParseError::MissingField("bus_id"))?;
        let event_type = parts.next().ok_or(ParseError::MissingField("type"))?;
        let data = parts.next().ok_or(ParseError::MissingField("data"))?;

        Ok(Self {
            device_class: device_class.to_string(),
            bus_id: bus_id.to_string(),
            event_type: parse_hex(event_type)?,
            data: parse_hex(data)?,
        })
    }
}

fn parse_hex(value: &str) -> Result<u32, ParseError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    u32::from_str_radix(stripped, 16).map_err(|_| ParseError::InvalidHex(value.to_string()))
}

/// Event republished on the auxiliary broadcast channel after a
/// notification has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcpiBusEvent {
    pub device_class: String,
    pub bus_id: String,
    pub event_type: u32,
    pub data: u32,
}

impl Display for AcpiBusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {:08x} {:08x}",
            self.device_class, self.bus_id, self.event_type, self.data
        )
    }
}

/// Fire-and-forget sink for [AcpiBusEvent]s. Implementations must not block.
pub trait EventBroadcaster: Send + Sync {
    fn send(&self, event: AcpiBusEvent);
}

impl EventBroadcaster for broadcast::Sender<AcpiBusEvent> {
    fn send(&self, event: AcpiBusEvent) {
        // No receivers is not an error for a broadcast
        if broadcast::Sender::send(self, event).is_err() {
            log::trace!("No listeners for ACPI bus event");
        }
    }
}

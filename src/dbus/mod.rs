pub mod interface;

use tokio::sync::mpsc;
use zbus::Connection;

use crate::acpi::event::{AcpiBusEvent, EventBroadcaster};

use self::interface::button::ButtonInterface;

const BUFFER_SIZE: usize = 1024;

/// [EventBroadcaster] that republishes events as DBus signals on the
/// [ButtonInterface] at the given path. Events are queued and emitted from a
/// separate task so sending never blocks.
#[derive(Debug, Clone)]
pub struct DBusBroadcaster {
    tx: mpsc::Sender<AcpiBusEvent>,
}

impl DBusBroadcaster {
    pub fn new(conn: Connection, path: String) -> Self {
        let (tx, mut rx) = mpsc::channel(BUFFER_SIZE);
        tokio::spawn(async move {
            log::debug!("Started DBus event broadcaster on {path}");
            while let Some(event) = rx.recv().await {
                if let Err(e) = ButtonInterface::emit_event(&conn, path.as_str(), event).await {
                    log::error!("Failed to emit ACPI event signal: {e:?}");
                }
            }
            log::debug!("Stopped DBus event broadcaster on {path}");
        });

        Self { tx }
    }
}

impl EventBroadcaster for DBusBroadcaster {
    fn send(&self, event: AcpiBusEvent) {
        if let Err(e) = self.tx.try_send(event) {
            log::warn!("Dropping ACPI bus event: {e}");
        }
    }
}

use std::error::Error;

use zbus::{fdo, object_server::SignalEmitter, Connection};
use zbus_macros::interface;

use crate::acpi::event::AcpiBusEvent;

/// The [ButtonInterface] republishes handled eject button events over DBus.
/// A single object is shared by every bound button.
pub struct ButtonInterface {
    name: String,
    push_count: u32,
}

impl ButtonInterface {
    pub fn new(name: &str) -> ButtonInterface {
        ButtonInterface {
            name: name.to_string(),
            push_count: 0,
        }
    }
}

#[interface(
    name = "org.shadowblip.Odde.Button",
    proxy(
        default_service = "org.shadowblip.Odde",
        default_path = "/org/shadowblip/Odde/Button"
    )
)]
impl ButtonInterface {
    /// Name of the button device
    #[zbus(property)]
    async fn name(&self) -> fdo::Result<String> {
        Ok(self.name.clone())
    }

    /// Sequence number of the last button event. With more than one button
    /// bound this is the counter of whichever button was pushed last; use
    /// the `bus_id` of the `AcpiEvent` signal to tell buttons apart.
    #[zbus(property)]
    async fn push_count(&self) -> fdo::Result<u32> {
        Ok(self.push_count)
    }

    /// Emitted for every handled button notification
    #[zbus(signal)]
    pub async fn acpi_event(
        emitter: &SignalEmitter<'_>,
        device_class: String,
        bus_id: String,
        event_type: u32,
        data: u32,
    ) -> zbus::Result<()>;
}

impl ButtonInterface {
    /// Emit the given event from the interface at the given path
    pub async fn emit_event(
        conn: &Connection,
        path: &str,
        event: AcpiBusEvent,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Get the object instance at the given path so we can send DBus signal
        // updates
        let iface_ref = conn
            .object_server()
            .interface::<_, ButtonInterface>(path)
            .await?;

        {
            let mut iface = iface_ref.get_mut().await;
            iface.push_count = event.data;
            iface
                .push_count_changed(iface_ref.signal_emitter())
                .await?;
        }

        ButtonInterface::acpi_event(
            iface_ref.signal_emitter(),
            event.device_class,
            event.bus_id,
            event.event_type,
            event.data,
        )
        .await?;

        Ok(())
    }
}

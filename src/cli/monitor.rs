use std::error::Error;

use futures::StreamExt;
use zbus::Connection;

use crate::{acpi::event::AcpiBusEvent, dbus::interface::button::ButtonInterfaceProxy};

/// Print every button event published by the daemon until interrupted
pub async fn handle_monitor(conn: Connection) -> Result<(), Box<dyn Error + Send + Sync>> {
    let button = ButtonInterfaceProxy::new(&conn).await?;
    let name = button.name().await.unwrap_or_default();
    println!("Monitoring events from: {name}");

    let mut events = button.receive_acpi_event().await?;
    while let Some(signal) = events.next().await {
        let args = signal.args()?;
        let event = AcpiBusEvent {
            device_class: args.device_class().clone(),
            bus_id: args.bus_id().clone(),
            event_type: *args.event_type(),
            data: *args.data(),
        };
        println!("{event}");
    }

    Ok(())
}

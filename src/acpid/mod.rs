//! Reads firmware events from the acpid socket. acpid publishes one event
//! per line in the form `<class> <bus_id> <type> <data>`, with type and data
//! as hex.

#[cfg(test)]
pub mod acpid_test;

use std::{error::Error, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    net::UnixStream,
    sync::mpsc,
};

use crate::acpi::event::AcpiEvent;

/// Delay before reconnecting after the acpid socket is unavailable or closed
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Forward events from the acpid socket at the given path, reconnecting
/// after `retry_delay` whenever the socket cannot be opened or closes.
/// Returns once the receiving side of the channel is closed.
pub async fn watch(path: String, tx: mpsc::Sender<AcpiEvent>, retry_delay: Duration) {
    loop {
        match listen(path.clone(), tx.clone()).await {
            Ok(()) => log::warn!("ACPI event stream from {path} ended"),
            Err(e) => log::warn!("Unable to read ACPI events from {path}: {e:?}"),
        }
        if tx.is_closed() {
            log::debug!("ACPI event receiver closed, stopping watch on {path}");
            return;
        }
        log::info!("Reconnecting to {path} in {retry_delay:?}");
        tokio::time::sleep(retry_delay).await;
    }
}

/// Connect to the acpid socket at the given path and forward every event
/// until the socket or the channel is closed.
pub async fn listen(
    path: String,
    tx: mpsc::Sender<AcpiEvent>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let stream = UnixStream::connect(path.as_str()).await?;
    log::info!("Listening for ACPI events on {path}");
    read_events(stream, tx).await
}

/// Read acpid formatted events from the given reader and send them over the
/// channel. Malformed lines are skipped.
pub async fn read_events<R>(
    reader: R,
    tx: mpsc::Sender<AcpiEvent>,
) -> Result<(), Box<dyn Error + Send + Sync>>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event = match line.parse::<AcpiEvent>() {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Ignoring malformed ACPI event '{line}': {e}");
                continue;
            }
        };
        log::trace!("Got ACPI event: {event:?}");
        if tx.send(event).await.is_err() {
            log::debug!("ACPI event receiver closed");
            return Ok(());
        }
    }
    log::debug!("ACPI event stream closed");

    Ok(())
}

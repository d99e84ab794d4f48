use std::{error::Error, fs, time::Duration};

use tokio::{io::AsyncWriteExt, net::UnixListener, sync::mpsc};

use crate::{
    acpi::event::AcpiEvent,
    acpid::{read_events, watch},
};

#[tokio::test]
async fn test_read_events() -> Result<(), Box<dyn Error + Send + Sync>> {
    let input = b"fujitsu/odde PNP0C32:00 00000080 00000001
ac_adapter ACPI0003:00 00000080

fujitsu/odde PNP0C32:00 00000100 00000002
";
    let (tx, mut rx) = mpsc::channel(8);
    read_events(&input[..], tx).await?;

    let first: AcpiEvent = rx.recv().await.ok_or("missing first event")?;
    assert_eq!(first.bus_id, "PNP0C32:00");
    assert_eq!(first.event_type, 0x80);

    // The malformed line and the blank line are skipped
    let second = rx.recv().await.ok_or("missing second event")?;
    assert_eq!(second.event_type, 0x100);
    assert_eq!(second.data, 2);

    assert!(rx.recv().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_read_events_closed_receiver() -> Result<(), Box<dyn Error + Send + Sync>> {
    let input = b"fujitsu/odde PNP0C32:00 00000080 00000001\n";
    let (tx, rx) = mpsc::channel(8);
    drop(rx);

    // A closed receiver ends the reader without an error
    read_events(&input[..], tx).await?;

    Ok(())
}

#[tokio::test]
async fn test_watch_reconnects() -> Result<(), Box<dyn Error + Send + Sync>> {
    let path = std::env::temp_dir().join(format!("odde-acpid-{}.socket", std::process::id()));
    let _ = fs::remove_file(&path);

    // The socket does not exist yet when watching starts
    let (tx, mut rx) = mpsc::channel(8);
    let watcher = tokio::spawn(watch(
        path.to_string_lossy().to_string(),
        tx,
        Duration::from_millis(10),
    ));
    tokio::time::sleep(Duration::from_millis(30)).await;
    let listener = UnixListener::bind(&path)?;

    // Each connection delivers one event and then closes, like acpid restarting
    for data in 1..=2u32 {
        let (mut stream, _) = listener.accept().await?;
        let line = format!("fujitsu/odde PNP0C32:00 00000080 {data:08x}\n");
        stream.write_all(line.as_bytes()).await?;
        drop(stream);

        let event = rx.recv().await.ok_or("missing event")?;
        assert_eq!(event.bus_id, "PNP0C32:00");
        assert_eq!(event.data, data);
    }

    // Closing the receiver ends the watch
    drop(rx);
    drop(listener);
    fs::remove_file(&path)?;
    tokio::time::timeout(Duration::from_secs(1), watcher).await??;

    Ok(())
}

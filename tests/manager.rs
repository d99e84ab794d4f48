use std::error::Error;
use std::sync::Arc;

use evdev::KeyCode;
use tokio::sync::broadcast;

use odde::acpi::bus::AcpiBus;
use odde::acpi::event::{AcpiBusEvent, AcpiEvent};
use odde::acpi::registry::DriverRegistry;
use odde::acpi::AcpiDevice;
use odde::config::BridgeConfig;
use odde::drivers::odde::driver::OddeDriver;
use odde::input::memory::{InputRecord, MemoryInput};
use odde::manager::{Manager, ManagerCommand};

fn new_manager(input: &MemoryInput, tx: broadcast::Sender<AcpiBusEvent>) -> Manager {
    let driver = OddeDriver::new(Arc::new(input.clone()), Arc::new(tx));
    let mut registry = DriverRegistry::new();
    registry
        .register(Arc::new(driver))
        .expect("driver should register");

    Manager::new(BridgeConfig::default(), AcpiBus::new(registry))
}

#[tokio::test]
async fn test_button_lifecycle() -> Result<(), Box<dyn Error>> {
    let input = MemoryInput::new();
    let (tx, mut rx) = broadcast::channel::<AcpiBusEvent>(16);
    let mut manager = new_manager(&input, tx);
    let commands = manager.transmitter();

    let device = AcpiDevice::new("PNP0C32", "PNP0C32:00", "/sys/devices/LNXSYSTM:00/PNP0C32:00");
    commands.send(ManagerCommand::DeviceAdded { device }).await?;
    for line in [
        "button/eject PNP0C32:00 00000080 00000000",
        "button/eject PNP0C32:00 00000100 00000000",
        "button/eject PNP0C32:00 00000001 00000000",
        "button/eject PNP0C32:01 00000080 00000000",
    ] {
        let event: AcpiEvent = line.parse()?;
        commands.send(ManagerCommand::AcpiEvent(event)).await?;
    }
    commands.send(ManagerCommand::Stop).await?;

    manager.process_commands().await;

    // Two pushes, each a press and release
    let key = KeyCode::KEY_EJECTCD;
    let press = InputRecord::Key { device: 0, key, value: 1 };
    let release = InputRecord::Key { device: 0, key, value: 0 };
    let sync = InputRecord::Sync { device: 0 };
    let expected = vec![
        press.clone(),
        sync.clone(),
        release.clone(),
        sync.clone(),
        press,
        sync.clone(),
        release,
        sync,
    ];
    assert_eq!(input.events(), expected);

    let first = rx.try_recv()?;
    assert_eq!(first.to_string(), "fujitsu/odde PNP0C32:00 00000080 00000001");
    let second = rx.try_recv()?;
    assert_eq!(second.to_string(), "fujitsu/odde PNP0C32:00 00000080 00000002");
    assert!(rx.try_recv().is_err());

    // Stopping the manager unbinds every device
    assert!(manager.bus().bound_devices().is_empty());
    assert!(input.registered_devices().is_empty());
    assert_eq!(
        input.records().last(),
        Some(&InputRecord::Unregistered { device: 0 })
    );

    Ok(())
}

#[tokio::test]
async fn test_rebind_resets_counter() -> Result<(), Box<dyn Error>> {
    let input = MemoryInput::new();
    let (tx, mut rx) = broadcast::channel::<AcpiBusEvent>(16);
    let mut manager = new_manager(&input, tx);
    let commands = manager.transmitter();
    let event: AcpiEvent = "button/eject PNP0C32:00 00000080 00000000".parse()?;

    let device = AcpiDevice::new("PNP0C32", "PNP0C32:00", "/sys/devices/PNP0C32:00");
    commands.send(ManagerCommand::DeviceAdded { device }).await?;
    commands.send(ManagerCommand::AcpiEvent(event.clone())).await?;
    commands
        .send(ManagerCommand::DeviceRemoved {
            bus_id: "PNP0C32:00".to_string(),
        })
        .await?;
    let device = AcpiDevice::new("PNP0C32", "PNP0C32:00", "/sys/devices/PNP0C32:00");
    commands.send(ManagerCommand::DeviceAdded { device }).await?;
    commands.send(ManagerCommand::AcpiEvent(event)).await?;
    commands.send(ManagerCommand::Stop).await?;

    manager.process_commands().await;

    assert_eq!(rx.try_recv()?.data, 1);
    assert_eq!(rx.try_recv()?.data, 1);

    let devices = input.devices();
    assert_eq!(devices.len(), 2);
    assert!(devices.iter().all(|device| !device.registered));
    assert_eq!(devices[1].phys, "PNP0C32/button/input0");

    Ok(())
}

#[tokio::test]
async fn test_unsupported_device_ignored() -> Result<(), Box<dyn Error>> {
    let input = MemoryInput::new();
    let (tx, _rx) = broadcast::channel::<AcpiBusEvent>(16);
    let mut manager = new_manager(&input, tx);
    let commands = manager.transmitter();

    let device = AcpiDevice::new("PNP0C0C", "PNP0C0C:00", "/sys/devices/PNP0C0C:00");
    commands.send(ManagerCommand::DeviceAdded { device }).await?;
    commands.send(ManagerCommand::Stop).await?;

    manager.process_commands().await;

    assert!(input.devices().is_empty());
    assert!(input.records().is_empty());

    Ok(())
}

use std::error::Error;

use tokio::sync::mpsc;

use crate::{
    acpi::{bus::AcpiBus, event::AcpiEvent, table_entries, AcpiDevice},
    acpid,
    config::BridgeConfig,
    udev,
};

const BUFFER_SIZE: usize = 1024;

/// Manager commands define all the different ways to interact with [Manager]
/// over a channel. These commands are processed in an asyncronous task and
/// dispatched as they come in.
#[derive(Debug)]
pub enum ManagerCommand {
    DeviceAdded { device: AcpiDevice },
    DeviceRemoved { bus_id: String },
    AcpiEvent(AcpiEvent),
    Stop,
}

/// Drives the [AcpiBus]. Every bind, notify and unbind goes through the
/// manager's command loop, so callbacks for a device never run concurrently.
pub struct Manager {
    config: BridgeConfig,
    bus: AcpiBus,
    /// The transmit side of the [rx] channel used to send [ManagerCommand]
    /// messages. This can be cloned to allow other tasks to communicate with
    /// the manager.
    tx: mpsc::Sender<ManagerCommand>,
    rx: mpsc::Receiver<ManagerCommand>,
}

impl Manager {
    pub fn new(config: BridgeConfig, bus: AcpiBus) -> Manager {
        let (tx, rx) = mpsc::channel(BUFFER_SIZE);
        Manager {
            config,
            bus,
            tx,
            rx,
        }
    }

    /// Returns a transmitter channel that can be used to send commands to
    /// the manager
    pub fn transmitter(&self) -> mpsc::Sender<ManagerCommand> {
        self.tx.clone()
    }

    pub fn bus(&self) -> &AcpiBus {
        &self.bus
    }

    /// Discover devices, start listening for firmware events and process
    /// commands until the manager is stopped.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.discover_devices().await;
        self.watch_acpi_events();
        self.process_commands().await;

        Ok(())
    }

    /// Process commands until a [ManagerCommand::Stop] is received, then
    /// unbind every device.
    pub async fn process_commands(&mut self) {
        while let Some(cmd) = self.rx.recv().await {
            log::trace!("Received command: {cmd:?}");
            match cmd {
                ManagerCommand::DeviceAdded { device } => self.on_device_added(device),
                ManagerCommand::DeviceRemoved { bus_id } => self.on_device_removed(bus_id),
                ManagerCommand::AcpiEvent(event) => self.on_acpi_event(event),
                ManagerCommand::Stop => break,
            }
        }

        log::debug!("Unbinding all devices");
        self.bus.detach_all();
    }

    /// Queue every ACPI device handled by a registered driver
    async fn discover_devices(&self) {
        let mut hids = Vec::new();
        for driver in self.bus.registry().drivers() {
            hids.extend(table_entries(driver.info().ids).map(|id| id.hid));
        }

        for hid in hids {
            let devices = match udev::discover_acpi_devices(hid) {
                Ok(devices) => devices,
                Err(e) => {
                    log::error!("Unable to discover {hid} devices: {e:?}");
                    continue;
                }
            };
            for device in devices {
                log::debug!("Discovered ACPI device: {}", device.bus_id());
                let result = self.tx.send(ManagerCommand::DeviceAdded { device }).await;
                if let Err(e) = result {
                    log::error!("Unable to send command: {e:?}");
                }
            }
        }
    }

    /// Start tasks reading firmware events from acpid and forwarding them to
    /// the manager. The acpid connection is re-established if it drops.
    fn watch_acpi_events(&self) {
        let (events_tx, mut events_rx) = mpsc::channel(BUFFER_SIZE);

        let path = self.config.acpid_socket.clone();
        tokio::spawn(acpid::watch(path, events_tx, acpid::RECONNECT_DELAY));

        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if tx.send(ManagerCommand::AcpiEvent(event)).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Called when an ACPI device is discovered
    fn on_device_added(&mut self, device: AcpiDevice) {
        let bus_id = device.bus_id().to_string();
        match self.bus.attach(device) {
            Ok(true) => log::debug!("Bound ACPI device {bus_id}"),
            Ok(false) => log::trace!("No driver for ACPI device {bus_id}"),
            Err(e) => log::error!("Unable to bind ACPI device {bus_id}: {e}"),
        }
    }

    /// Called when an ACPI device goes away
    fn on_device_removed(&mut self, bus_id: String) {
        if !self.bus.detach(bus_id.as_str()) {
            log::debug!("Device {bus_id} was not bound");
        }
    }

    /// Called for every firmware event read from acpid
    fn on_acpi_event(&mut self, event: AcpiEvent) {
        self.bus.notify(event.bus_id.as_str(), event.event_type);
    }
}

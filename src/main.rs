use std::env;
use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::broadcast;
use zbus::Connection;

use odde::acpi::bus::AcpiBus;
use odde::acpi::event::{AcpiBusEvent, EventBroadcaster};
use odde::acpi::registry::DriverRegistry;
use odde::cli::{main_cli, Args, Commands};
use odde::config::{BridgeConfig, InputBackend};
use odde::constants::{BUS_NAME, BUTTON_PATH};
use odde::dbus::interface::button::ButtonInterface;
use odde::dbus::DBusBroadcaster;
use odde::drivers::odde::driver::{OddeDriver, ACPI_BUTTON_DEVICE_NAME};
use odde::input::memory::MemoryInput;
use odde::input::uinput::UinputSubsystem;
use odde::input::InputSubsystem;
use odde::manager::{Manager, ManagerCommand};

const BUFFER_SIZE: usize = 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let args = Args::parse();
    match args.cmd {
        None | Some(Commands::Run) => (),
        Some(_) => return main_cli(args).await,
    }

    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting odde v{}", VERSION);

    let config = BridgeConfig::load(args.config)?;
    log::debug!("Using config: {config:?}");

    // Select where virtual input devices get created
    let input: Arc<dyn InputSubsystem> = match config.input {
        InputBackend::Uinput => Arc::new(UinputSubsystem::new()),
        InputBackend::Memory => {
            log::info!("Using in-memory input devices, no events will reach the system");
            Arc::new(MemoryInput::new())
        }
    };

    // Republish button events over DBus, or only log them
    let broadcaster: Arc<dyn EventBroadcaster> = if config.dbus {
        let connection = Connection::system().await?;
        let iface = ButtonInterface::new(ACPI_BUTTON_DEVICE_NAME);
        connection.object_server().at(BUTTON_PATH, iface).await?;
        connection.request_name(BUS_NAME).await?;
        Arc::new(DBusBroadcaster::new(connection, BUTTON_PATH.to_string()))
    } else {
        let (tx, mut rx) = broadcast::channel::<AcpiBusEvent>(BUFFER_SIZE);
        tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                log::info!("ACPI event: {event}");
            }
        });
        Arc::new(tx)
    };

    // Register the eject button driver
    let driver = OddeDriver::with_capacity(input, broadcaster, config.max_devices);
    let mut registry = DriverRegistry::new();
    registry.register(Arc::new(driver))?;

    let mut manager = Manager::new(config, AcpiBus::new(registry));

    // Setup CTRL+C handler
    let tx = manager.transmitter();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for shutdown signal: {e:?}");
        }
        log::info!("Shutting down");
        if let Err(e) = tx.send(ManagerCommand::Stop).await {
            log::error!("Unable to stop manager: {e:?}");
        }
    });

    manager.run().await?;
    log::info!("odde stopped");

    Ok(())
}

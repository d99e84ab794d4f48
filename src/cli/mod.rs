pub mod device;
pub mod monitor;

use std::error::Error;

use clap::{Parser, Subcommand};
use zbus::{names::BusName, Connection};

use crate::constants::BUS_NAME;

use self::device::{handle_devices, handle_ids};
use self::monitor::handle_monitor;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the odde daemon (default)
    Run,
    /// List eject button devices found on this system
    Devices,
    /// Show the hardware ids handled by the daemon
    Ids,
    /// Print button events published by a running daemon
    Monitor,
}

pub async fn main_cli(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(cmd) = args.cmd else {
        return Ok(());
    };

    match cmd {
        Commands::Run => (),
        Commands::Devices => handle_devices()?,
        Commands::Ids => handle_ids(),
        Commands::Monitor => {
            let connection = Connection::system().await?;
            if !is_running(&connection).await {
                return Err("odde daemon is not currently running".into());
            }
            handle_monitor(connection).await?
        }
    }

    Ok(())
}

/// Returns true if the odde daemon is currently running
async fn is_running(conn: &Connection) -> bool {
    let Ok(bus) = BusName::try_from(BUS_NAME) else {
        return false;
    };
    let dbus = zbus::fdo::DBusProxy::new(conn).await.ok();
    let Some(dbus) = dbus else {
        return false;
    };
    dbus.name_has_owner(bus).await.unwrap_or_default()
}

pub mod acpi;
pub mod acpid;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dbus;
pub mod drivers;
pub mod input;
pub mod manager;
pub mod udev;

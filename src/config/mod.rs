#[cfg(test)]
pub mod config_test;

use std::{io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_ACPID_SOCKET, DEFAULT_CONFIG_PATH},
    drivers::odde::driver::DEFAULT_MAX_BUTTONS,
};

/// Represents all possible errors loading a [BridgeConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Where virtual input devices get created
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputBackend {
    /// Kernel uinput devices
    #[default]
    Uinput,
    /// In-memory devices that only log their events
    Memory,
}

/// Daemon configuration. Every field is optional in the YAML file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BridgeConfig {
    /// Path to the acpid socket to read firmware events from
    #[serde(default = "default_acpid_socket")]
    pub acpid_socket: String,
    /// Whether to republish events on DBus
    #[serde(default = "default_dbus")]
    pub dbus: bool,
    /// Maximum number of eject buttons to bind at once
    #[serde(default = "default_max_devices")]
    pub max_devices: usize,
    #[serde(default)]
    pub input: InputBackend,
}

fn default_acpid_socket() -> String {
    DEFAULT_ACPID_SOCKET.to_string()
}

fn default_dbus() -> bool {
    true
}

fn default_max_devices() -> usize {
    DEFAULT_MAX_BUTTONS
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            acpid_socket: default_acpid_socket(),
            dbus: default_dbus(),
            max_devices: default_max_devices(),
            input: InputBackend::default(),
        }
    }
}

impl BridgeConfig {
    /// Load a [BridgeConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<BridgeConfig, LoadError> {
        let config: BridgeConfig = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [BridgeConfig] from the given YAML file
    pub fn from_yaml_file(path: String) -> Result<BridgeConfig, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: BridgeConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Load the configuration from the given path, or from the default path
    /// if none is given. A missing default config file yields the default
    /// configuration.
    pub fn load(path: Option<String>) -> Result<BridgeConfig, LoadError> {
        if let Some(path) = path {
            log::debug!("Loading config from {path}");
            return Self::from_yaml_file(path);
        }
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            log::debug!("No config found at {DEFAULT_CONFIG_PATH}, using defaults");
            return Ok(BridgeConfig::default());
        }
        log::debug!("Loading config from {DEFAULT_CONFIG_PATH}");
        Self::from_yaml_file(DEFAULT_CONFIG_PATH.to_string())
    }
}

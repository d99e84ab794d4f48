use std::error::Error;

use crate::config::{BridgeConfig, InputBackend, LoadError};

#[test]
fn test_full_config() -> Result<(), Box<dyn Error>> {
    let yaml = r#"
acpid_socket: /run/acpid.socket
dbus: false
max_devices: 1
input: memory
"#;
    let config = BridgeConfig::from_yaml(yaml.to_string())?;
    assert_eq!(config.acpid_socket, "/run/acpid.socket");
    assert!(!config.dbus);
    assert_eq!(config.max_devices, 1);
    assert_eq!(config.input, InputBackend::Memory);

    Ok(())
}

#[test]
fn test_defaults() -> Result<(), Box<dyn Error>> {
    let config = BridgeConfig::from_yaml("dbus: false".to_string())?;
    assert_eq!(
        config,
        BridgeConfig {
            dbus: false,
            ..Default::default()
        }
    );
    assert_eq!(config.acpid_socket, "/var/run/acpid.socket");
    assert_eq!(config.max_devices, 4);
    assert_eq!(config.input, InputBackend::Uinput);

    let config = BridgeConfig::from_yaml("{}".to_string())?;
    assert_eq!(config, BridgeConfig::default());

    Ok(())
}

#[test]
fn test_invalid_config() {
    let result = BridgeConfig::from_yaml("input: joystick".to_string());
    assert!(matches!(result, Err(LoadError::DeserializeError(_))));

    let result = BridgeConfig::from_yaml_file("/nonexistent/odde.yaml".to_string());
    assert!(matches!(result, Err(LoadError::IoError(_))));
}

#[test]
fn test_installed_config() -> Result<(), Box<dyn Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/rootfs/etc/odde/config.yaml");
    let config = BridgeConfig::from_yaml_file(path.to_string())?;
    assert_eq!(config, BridgeConfig::default());

    Ok(())
}

pub const BUS_NAME: &str = "org.shadowblip.Odde";
pub const BUS_PREFIX: &str = "/org/shadowblip/Odde";
pub const BUTTON_PATH: &str = "/org/shadowblip/Odde/Button";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/odde/config.yaml";
pub const DEFAULT_ACPID_SOCKET: &str = "/var/run/acpid.socket";

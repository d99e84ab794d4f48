use std::error::Error;

use crate::acpi::event::{
    normalize, AcpiBusEvent, AcpiEvent, ParseError, ACPI_BUTTON_NOTIFY_STATUS,
    ACPI_FIXED_HARDWARE_EVENT,
};

#[test]
fn test_normalize() {
    assert_eq!(normalize(ACPI_FIXED_HARDWARE_EVENT), ACPI_BUTTON_NOTIFY_STATUS);
    assert_eq!(normalize(ACPI_BUTTON_NOTIFY_STATUS), ACPI_BUTTON_NOTIFY_STATUS);
    for event in [0x00, 0x01, 0x81, 0xff, 0x101, u32::MAX] {
        assert_eq!(normalize(event), event);
    }
}

#[test]
fn test_parse_acpid_line() -> Result<(), Box<dyn Error>> {
    let event: AcpiEvent = "fujitsu/odde PNP0C32:00 00000080 00000001".parse()?;
    assert_eq!(
        event,
        AcpiEvent {
            device_class: "fujitsu/odde".to_string(),
            bus_id: "PNP0C32:00".to_string(),
            event_type: 0x80,
            data: 1,
        }
    );

    let event: AcpiEvent = "button/power PBTN 0x00000100 0000000a\n".parse()?;
    assert_eq!(event.event_type, ACPI_FIXED_HARDWARE_EVENT);
    assert_eq!(event.data, 10);

    Ok(())
}

#[test]
fn test_parse_invalid_lines() {
    assert_eq!("".parse::<AcpiEvent>(), Err(ParseError::MissingField("class")));
    assert_eq!(
        "ac_adapter ACPI0003:00 00000080".parse::<AcpiEvent>(),
        Err(ParseError::MissingField("data"))
    );
    assert_eq!(
        "ac_adapter ACPI0003:00 zz 00000001".parse::<AcpiEvent>(),
        Err(ParseError::InvalidHex("zz".to_string()))
    );
}

#[test]
fn test_bus_event_display() {
    let event = AcpiBusEvent {
        device_class: "fujitsu/odde".to_string(),
        bus_id: "PNP0C32:00".to_string(),
        event_type: 0x80,
        data: 2,
    };
    assert_eq!(event.to_string(), "fujitsu/odde PNP0C32:00 00000080 00000002");

    // Displayed events can be parsed back as acpid lines
    let parsed: AcpiEvent = event.to_string().parse().expect("should parse");
    assert_eq!(parsed.data, 2);
}

use crate::drivers::odde::phys::{format_phys, PHYS_LEN};

#[test]
fn test_format_phys() {
    let phys = format_phys("PNP0C32");
    assert_eq!(phys.as_str(), "PNP0C32/button/input0");
}

#[test]
fn test_format_phys_truncates() {
    let hid = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let phys = format_phys(hid);
    assert_eq!(phys.len(), PHYS_LEN - 1);
    assert_eq!(phys.as_str(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ/butt");
}

#[test]
fn test_format_phys_truncates_on_char_boundary() {
    // 29 ASCII bytes followed by a 3 byte character that would end past
    // the limit
    let hid = format!("{}€", "A".repeat(29));
    let phys = format_phys(hid.as_str());
    assert_eq!(phys.as_str(), "A".repeat(29));
    assert!(phys.len() < PHYS_LEN);
}

#[test]
fn test_format_phys_empty_hid() {
    let phys = format_phys("");
    assert_eq!(phys.as_str(), "/button/input0");
}

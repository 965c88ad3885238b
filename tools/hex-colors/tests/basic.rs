use hex_colors::color_from_hex as hex;

#[test]
fn integer_literals() {
    assert_eq!(hex!(0xDC143Cff), [0xDC, 0x14, 0x3C, 0xFF]);
    assert_eq!(hex!(0xDC143C), [220, 20, 60]);
    assert_eq!(hex!(0xdc_14_3c), [220, 20, 60]);
}

#[test]
fn string_literals() {
    assert_eq!(hex!("#dc143c"), [220, 20, 60]);
    assert_eq!(hex!("DC143C00"), [0xDC, 0x14, 0x3C, 0x00]);
}

#[test]
fn usable_in_const() {
    const SKY: [u8; 3] = hex!(0x87ceeb);
    assert_eq!(SKY, [135, 206, 235]);
}

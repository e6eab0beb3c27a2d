use super::*;

#[test]
fn header_carries_version_and_body_length() {
    let mut b = PatchBuilder::new();
    assert!(b.is_empty());
    b.create_node(1, NodeKind::Column).delete_node(1);
    let bytes = b.build();

    assert_eq!(bytes[0], PATCH_VERSION);
    assert_eq!(bytes[1], 0);
    assert_eq!(u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]), 9 + 5);
    assert_eq!(bytes.len(), b.len());
}

#[test]
fn records_are_little_endian() {
    let bytes = PatchBuilder::new().create_node(0x0102_0304, NodeKind::Button).build();
    assert_eq!(&bytes[6..], &[1, 4, 3, 2, 1, 6, 0, 0, 0]);
}

#[test]
fn padding_packs_top_right_bottom_left() {
    let bytes = PatchBuilder::new()
        .set_padding(
            3,
            Padding {
                left: 1,
                top: 2,
                right: 3,
                bottom: 4,
            },
        )
        .build();
    let value = i32::from_le_bytes([bytes[15], bytes[16], bytes[17], bytes[18]]);
    assert_eq!(value as u32, 0x0203_0401);
}

#[test]
fn text_is_length_prefixed_utf8() {
    let bytes = PatchBuilder::new().set_text(7, "héllo").build();
    let len = i32::from_le_bytes([bytes[15], bytes[16], bytes[17], bytes[18]]);
    assert_eq!(len, "héllo".len() as i32);
    assert_eq!(&bytes[19..], "héllo".as_bytes());
}

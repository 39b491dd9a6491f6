//! Byte-exact round trip through the evidence encoder.

use std::path::Path;

use plumb_core::evidence::{self, Evidence};

const PNG_HEADER: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

#[test]
fn every_byte_value_survives() {
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
    let encoded = evidence::encode(Some(bytes.as_slice())).expect("bytes present");
    assert_eq!(evidence::decode(&encoded).unwrap(), bytes);
}

#[test]
fn empty_upload_round_trips_to_empty() {
    let encoded = evidence::encode(Some(&[][..])).expect("present but empty");
    assert!(encoded.is_empty());
    assert!(evidence::decode(&encoded).unwrap().is_empty());
}

#[test]
fn data_uri_payload_decodes_to_upload() {
    let upload = Evidence::from_upload(Path::new("ceiling.png"), PNG_HEADER.to_vec());
    let uri = upload.inline_image().expect("png is an image");
    let payload = uri
        .strip_prefix("data:image/png;base64,")
        .expect("png data uri prefix");
    assert_eq!(evidence::decode(payload).unwrap(), PNG_HEADER);
}

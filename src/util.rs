use crate::codec::to_hex;
use pretty_assertions::assert_eq;

/// compares byte buffers by their hex form, so a mismatch shows up as a readable diff
#[allow(clippy::missing_panics_doc)]
pub(crate) fn assert_bytes_eq(l: &[u8], r: &[u8]) {
    assert_eq!(to_hex(l), to_hex(r));
}

/// decodes a hex literal of a test vector
pub(crate) fn hex(text: &str) -> Vec<u8> {
    hex::decode(text).unwrap()
}

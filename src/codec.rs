//! Conversions between opaque byte buffers and their textual forms.
//!
//! A *binary string* maps every byte onto the char with the same code point
//! (U+0000..=U+00FF), so any byte sequence survives the trip through text
//! unchanged. Hex is offered for human facing input and output.

use crate::error::{CryptoError, Result};

/// Maps each byte onto the char with the same code point.
pub fn to_binary_string<B>(bytes: B) -> String
where
    B: AsRef<[u8]>,
{
    bytes.as_ref().iter().copied().map(char::from).collect()
}

/// Inverse of [`to_binary_string`].
///
/// Fails with [`CryptoError::InvalidParameter`] if the text contains a char
/// above U+00FF, which has no single byte representation.
pub fn from_binary_string(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(pos, c)| {
            u8::try_from(c).map_err(|_| {
                CryptoError::InvalidParameter(format!(
                    "char {c:?} at position {pos} is not a binary string byte"
                ))
            })
        })
        .collect()
}

/// Lower case hex representation of the bytes.
pub fn to_hex<B>(bytes: B) -> String
where
    B: AsRef<[u8]>,
{
    hex::encode(bytes)
}

/// Decodes hex text (either case) into bytes.
pub fn from_hex<T>(text: T) -> Result<Vec<u8>>
where
    T: AsRef<[u8]>,
{
    hex::decode(text).map_err(|err| {
        log::debug!("Rejecting hex input: {err}");
        CryptoError::InvalidParameter(err.to_string())
    })
}

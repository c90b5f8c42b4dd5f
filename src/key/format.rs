use std::{fmt, str::FromStr};

use crate::error::CryptoError;

/// Encoding of key material on import and export.
/// Only [`KeyFormat::Raw`] is implemented, the others fail with [`CryptoError::UnsupportedKeyFormat`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyFormat {
    /// the plain secret bytes
    Raw,
    /// PKCS #8 private key info
    Pkcs8,
    /// X.509 subject public key info
    Spki,
    /// JSON web key
    Jwk,
}

impl KeyFormat {
    /// WebCrypto spelling of the format
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyFormat::Raw => "raw",
            KeyFormat::Pkcs8 => "pkcs8",
            KeyFormat::Spki => "spki",
            KeyFormat::Jwk => "jwk",
        }
    }
}

impl FromStr for KeyFormat {
    type Err = CryptoError;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "raw" => Ok(KeyFormat::Raw),
            "pkcs8" => Ok(KeyFormat::Pkcs8),
            "spki" => Ok(KeyFormat::Spki),
            "jwk" => Ok(KeyFormat::Jwk),
            unknown => Err(CryptoError::UnsupportedKeyFormat(unknown.to_owned())),
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

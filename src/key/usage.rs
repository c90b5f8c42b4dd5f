use std::{fmt, str::FromStr};

use crate::error::CryptoError;

/// Operations a key may be used for
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum KeyUsage {
    /// `encrypt`
    Encrypt,
    /// `decrypt`
    Decrypt,
    /// `sign`
    Sign,
    /// `verify`
    Verify,
    /// `deriveKey`
    DeriveKey,
    /// `deriveBits`
    DeriveBits,
    /// `wrapKey`
    WrapKey,
    /// `unwrapKey`
    UnwrapKey,
}

impl KeyUsage {
    /// WebCrypto spelling of the usage
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyUsage::Encrypt => "encrypt",
            KeyUsage::Decrypt => "decrypt",
            KeyUsage::Sign => "sign",
            KeyUsage::Verify => "verify",
            KeyUsage::DeriveKey => "deriveKey",
            KeyUsage::DeriveBits => "deriveBits",
            KeyUsage::WrapKey => "wrapKey",
            KeyUsage::UnwrapKey => "unwrapKey",
        }
    }
}

impl FromStr for KeyUsage {
    type Err = CryptoError;

    fn from_str(usage: &str) -> Result<Self, Self::Err> {
        match usage {
            "encrypt" => Ok(KeyUsage::Encrypt),
            "decrypt" => Ok(KeyUsage::Decrypt),
            "sign" => Ok(KeyUsage::Sign),
            "verify" => Ok(KeyUsage::Verify),
            "deriveKey" => Ok(KeyUsage::DeriveKey),
            "deriveBits" => Ok(KeyUsage::DeriveBits),
            "wrapKey" => Ok(KeyUsage::WrapKey),
            "unwrapKey" => Ok(KeyUsage::UnwrapKey),
            unknown => Err(CryptoError::InvalidParameter(format!(
                "unknown key usage {unknown:?}"
            ))),
        }
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

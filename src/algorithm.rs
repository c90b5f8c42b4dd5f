use std::{fmt, str::FromStr};

use crate::{
    crypto::variant::AES_BLOCK_LEN,
    error::{CryptoError, Result},
};

/// Registered names of the algorithms this crate can run
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AlgorithmName {
    /// AES in cipher block chaining mode
    AesCbc,
    /// AES in 128 bit cipher feedback mode
    AesCfb,
    /// SHA-1
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl AlgorithmName {
    /// all supported names
    pub const ALL: [AlgorithmName; 7] = [
        AlgorithmName::AesCbc,
        AlgorithmName::AesCfb,
        AlgorithmName::Sha1,
        AlgorithmName::Sha224,
        AlgorithmName::Sha256,
        AlgorithmName::Sha384,
        AlgorithmName::Sha512,
    ];

    /// canonical spelling of the name
    pub const fn as_str(&self) -> &'static str {
        match self {
            AlgorithmName::AesCbc => "AES-CBC",
            AlgorithmName::AesCfb => "AES-CFB",
            AlgorithmName::Sha1 => "SHA-1",
            AlgorithmName::Sha224 => "SHA-224",
            AlgorithmName::Sha256 => "SHA-256",
            AlgorithmName::Sha384 => "SHA-384",
            AlgorithmName::Sha512 => "SHA-512",
        }
    }
}

impl FromStr for AlgorithmName {
    type Err = CryptoError;

    fn from_str(name: &str) -> Result<Self> {
        AlgorithmName::ALL
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| CryptoError::UnsupportedAlgorithm(name.to_owned()))
    }
}

impl fmt::Display for AlgorithmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Algorithm as handed in by a caller, either a bare name or a parameter object.
/// Turned into [`AlgorithmParams`] by [`normalize`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AlgorithmIdentifier {
    /// e.g. `"SHA-256"`
    Name(String),
    /// e.g. `{ name: "AES-CBC", iv: [..] }`
    Params {
        /// algorithm name, matched case insensitive
        name: String,
        /// initialization vector for block cipher modes
        iv: Option<Vec<u8>>,
    },
}

impl AlgorithmIdentifier {
    /// parameter object carrying an initialization vector
    pub fn with_iv<N, I>(name: N, iv: I) -> Self
    where
        N: Into<String>,
        I: Into<Vec<u8>>,
    {
        AlgorithmIdentifier::Params {
            name: name.into(),
            iv: Some(iv.into()),
        }
    }

    fn name(&self) -> &str {
        match self {
            AlgorithmIdentifier::Name(name) | AlgorithmIdentifier::Params { name, .. } => name,
        }
    }
}

impl From<&str> for AlgorithmIdentifier {
    fn from(name: &str) -> Self {
        AlgorithmIdentifier::Name(name.to_owned())
    }
}

impl From<String> for AlgorithmIdentifier {
    fn from(name: String) -> Self {
        AlgorithmIdentifier::Name(name)
    }
}

impl From<AlgorithmName> for AlgorithmIdentifier {
    fn from(name: AlgorithmName) -> Self {
        AlgorithmIdentifier::Name(name.as_str().to_owned())
    }
}

impl From<AlgorithmParams> for AlgorithmIdentifier {
    fn from(params: AlgorithmParams) -> Self {
        AlgorithmIdentifier::Params {
            name: params.name.as_str().to_owned(),
            iv: params.iv,
        }
    }
}

/// Canonical algorithm record, the output of [`normalize`]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AlgorithmParams {
    /// the recognized algorithm
    pub name: AlgorithmName,
    /// initialization vector, required by the cipher modes
    pub iv: Option<Vec<u8>>,
}

impl AlgorithmParams {
    /// record without any mode specific fields
    pub fn new(name: AlgorithmName) -> Self {
        Self { name, iv: None }
    }

    /// sets the initialization vector
    pub fn with_iv<I>(mut self, iv: I) -> Self
    where
        I: Into<Vec<u8>>,
    {
        self.iv = Some(iv.into());
        self
    }
}

/// Accepts a bare name or a parameter object and produces the canonical [`AlgorithmParams`].
/// Fails with [`CryptoError::UnsupportedAlgorithm`] if the name is not one of [`AlgorithmName`].
pub fn normalize<A>(algorithm: A) -> Result<AlgorithmParams>
where
    A: Into<AlgorithmIdentifier>,
{
    let algorithm = algorithm.into();
    let name = algorithm.name().parse()?;
    let iv = match algorithm {
        AlgorithmIdentifier::Name(_) => None,
        AlgorithmIdentifier::Params { iv, .. } => iv,
    };

    Ok(AlgorithmParams { name, iv })
}

/// block cipher mode of operation
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CipherMode {
    /// cipher block chaining, padded
    Cbc,
    /// cipher feedback with 128 bit segments, unpadded stream
    Cfb,
}

/// Parameters of the cipher algorithm family.
/// Unlike [`AlgorithmParams`] the IV is guaranteed to be there and of the right size.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CipherParams {
    /// mode of operation
    pub mode: CipherMode,
    /// initialization vector
    pub iv: [u8; AES_BLOCK_LEN],
}

impl TryFrom<&AlgorithmParams> for CipherParams {
    type Error = CryptoError;

    fn try_from(params: &AlgorithmParams) -> Result<Self> {
        let mode = match params.name {
            AlgorithmName::AesCbc => CipherMode::Cbc,
            AlgorithmName::AesCfb => CipherMode::Cfb,
            name => return Err(CryptoError::UnsupportedAlgorithm(name.to_string())),
        };

        let iv = params
            .iv
            .as_deref()
            .ok_or(CryptoError::MissingParameter("iv"))?;
        let iv: [u8; AES_BLOCK_LEN] = iv.try_into().map_err(|_| {
            CryptoError::InvalidParameter(format!(
                "iv must be {AES_BLOCK_LEN} bytes, got {}",
                iv.len()
            ))
        })?;

        Ok(Self { mode, iv })
    }
}

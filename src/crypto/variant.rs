use crate::{
    algorithm::{AlgorithmName, AlgorithmParams, CipherMode},
    error::{CryptoError, Result},
};

/// block size of AES, which is also the IV size of CBC and CFB
pub const AES_BLOCK_LEN: usize = 16;

/// Concrete cipher primitive, chosen by mode and key length
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CipherVariant {
    /// AES-128 in CBC mode
    Aes128Cbc,
    /// AES-192 in CBC mode
    Aes192Cbc,
    /// AES-256 in CBC mode
    Aes256Cbc,
    /// AES-128 in CFB128 mode
    Aes128Cfb,
    /// AES-192 in CFB128 mode
    Aes192Cfb,
    /// AES-256 in CFB128 mode
    Aes256Cfb,
}

impl CipherVariant {
    /// Selects the primitive for the mode and the raw key length in bytes.
    /// Anything but 16, 24 or 32 byte keys fails with [`CryptoError::UnsupportedAlgorithm`].
    pub fn select(mode: CipherMode, key_len: usize) -> Result<Self> {
        use CipherVariant::*;
        let variant = match (mode, key_len) {
            (CipherMode::Cbc, 16) => Aes128Cbc,
            (CipherMode::Cbc, 24) => Aes192Cbc,
            (CipherMode::Cbc, 32) => Aes256Cbc,
            (CipherMode::Cfb, 16) => Aes128Cfb,
            (CipherMode::Cfb, 24) => Aes192Cfb,
            (CipherMode::Cfb, 32) => Aes256Cfb,
            (mode, key_len) => {
                return Err(CryptoError::UnsupportedAlgorithm(format!(
                    "{mode:?} with a {key_len} byte key"
                )))
            }
        };

        Ok(variant)
    }

    /// the mode of operation
    pub fn mode(&self) -> CipherMode {
        use CipherVariant::*;
        match self {
            Aes128Cbc | Aes192Cbc | Aes256Cbc => CipherMode::Cbc,
            Aes128Cfb | Aes192Cfb | Aes256Cfb => CipherMode::Cfb,
        }
    }

    /// key length in bytes
    pub fn key_len(&self) -> usize {
        use CipherVariant::*;
        match self {
            Aes128Cbc | Aes128Cfb => 16,
            Aes192Cbc | Aes192Cfb => 24,
            Aes256Cbc | Aes256Cfb => 32,
        }
    }
}

/// whether a cipher encrypts or decrypts
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Direction {
    /// plain text in, cipher text out
    Encrypt,
    /// cipher text in, plain text out
    Decrypt,
}

/// Hash function of the digest operation
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum DigestAlgorithm {
    /// SHA-1, 20 byte output
    Sha1,
    /// SHA-224, 28 byte output
    Sha224,
    /// SHA-256, 32 byte output
    Sha256,
    /// SHA-384, 48 byte output
    Sha384,
    /// SHA-512, 64 byte output
    Sha512,
}

impl DigestAlgorithm {
    /// size of the digest in bytes
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha224 => 28,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

impl TryFrom<&AlgorithmParams> for DigestAlgorithm {
    type Error = CryptoError;

    fn try_from(params: &AlgorithmParams) -> Result<Self> {
        match params.name {
            AlgorithmName::Sha1 => Ok(DigestAlgorithm::Sha1),
            AlgorithmName::Sha224 => Ok(DigestAlgorithm::Sha224),
            AlgorithmName::Sha256 => Ok(DigestAlgorithm::Sha256),
            AlgorithmName::Sha384 => Ok(DigestAlgorithm::Sha384),
            AlgorithmName::Sha512 => Ok(DigestAlgorithm::Sha512),
            name @ (AlgorithmName::AesCbc | AlgorithmName::AesCfb) => {
                Err(CryptoError::UnsupportedAlgorithm(name.to_string()))
            }
        }
    }
}

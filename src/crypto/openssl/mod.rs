//! OpenSSL-based cryptographic operations.

mod hash;
mod symm;

use crate::{
    crypto::{
        variant::{CipherVariant, DigestAlgorithm, Direction},
        CipherSetup, CryptoProvider, Primitive,
    },
    error::{CryptoError, Result},
};

/// Crypto provider using the OpenSSL library.
///
/// Supports all cipher variants and digest algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Openssl;

impl CryptoProvider for Openssl {
    fn cipher(&self, setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>> {
        symm::engine(setup)
    }

    fn digest(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Primitive>> {
        hash::engine(algorithm.into())
    }
}

impl From<CipherVariant> for openssl::symm::Cipher {
    fn from(variant: CipherVariant) -> Self {
        match variant {
            CipherVariant::Aes128Cbc => openssl::symm::Cipher::aes_128_cbc(),
            CipherVariant::Aes192Cbc => openssl::symm::Cipher::aes_192_cbc(),
            CipherVariant::Aes256Cbc => openssl::symm::Cipher::aes_256_cbc(),
            CipherVariant::Aes128Cfb => openssl::symm::Cipher::aes_128_cfb128(),
            CipherVariant::Aes192Cfb => openssl::symm::Cipher::aes_192_cfb128(),
            CipherVariant::Aes256Cfb => openssl::symm::Cipher::aes_256_cfb128(),
        }
    }
}

impl From<Direction> for openssl::symm::Mode {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Encrypt => openssl::symm::Mode::Encrypt,
            Direction::Decrypt => openssl::symm::Mode::Decrypt,
        }
    }
}

impl From<DigestAlgorithm> for openssl::hash::MessageDigest {
    fn from(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Sha1 => openssl::hash::MessageDigest::sha1(),
            DigestAlgorithm::Sha224 => openssl::hash::MessageDigest::sha224(),
            DigestAlgorithm::Sha256 => openssl::hash::MessageDigest::sha256(),
            DigestAlgorithm::Sha384 => openssl::hash::MessageDigest::sha384(),
            DigestAlgorithm::Sha512 => openssl::hash::MessageDigest::sha512(),
        }
    }
}

impl From<openssl::error::ErrorStack> for CryptoError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        log::debug!("Operation failed, OpenSSL error stack: {err}");
        CryptoError::OperationFailure(err.to_string())
    }
}

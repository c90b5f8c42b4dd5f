//! RustCrypto-based cryptographic operations.
//!
//! This module uses pure Rust implementations from the RustCrypto project.

mod block_mode;
mod hash;

use crate::{
    crypto::{
        variant::{CipherVariant, DigestAlgorithm, Direction},
        CipherSetup, CryptoProvider, Primitive,
    },
    error::Result,
};
use aes::{Aes128, Aes192, Aes256};

/// Crypto provider using RustCrypto libraries.
///
/// Supports all cipher variants and digest algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RustCrypto;

impl CryptoProvider for RustCrypto {
    fn cipher(&self, setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>> {
        use CipherVariant::*;
        match (setup.variant, setup.direction) {
            (Aes128Cbc, Direction::Encrypt) => {
                block_mode::cbc_encryptor::<cbc::Encryptor<Aes128>>(setup)
            }
            (Aes192Cbc, Direction::Encrypt) => {
                block_mode::cbc_encryptor::<cbc::Encryptor<Aes192>>(setup)
            }
            (Aes256Cbc, Direction::Encrypt) => {
                block_mode::cbc_encryptor::<cbc::Encryptor<Aes256>>(setup)
            }
            (Aes128Cbc, Direction::Decrypt) => {
                block_mode::cbc_decryptor::<cbc::Decryptor<Aes128>>(setup)
            }
            (Aes192Cbc, Direction::Decrypt) => {
                block_mode::cbc_decryptor::<cbc::Decryptor<Aes192>>(setup)
            }
            (Aes256Cbc, Direction::Decrypt) => {
                block_mode::cbc_decryptor::<cbc::Decryptor<Aes256>>(setup)
            }
            (Aes128Cfb, Direction::Encrypt) => {
                block_mode::cfb_stream::<cfb_mode::BufEncryptor<Aes128>>(setup)
            }
            (Aes192Cfb, Direction::Encrypt) => {
                block_mode::cfb_stream::<cfb_mode::BufEncryptor<Aes192>>(setup)
            }
            (Aes256Cfb, Direction::Encrypt) => {
                block_mode::cfb_stream::<cfb_mode::BufEncryptor<Aes256>>(setup)
            }
            (Aes128Cfb, Direction::Decrypt) => {
                block_mode::cfb_stream::<cfb_mode::BufDecryptor<Aes128>>(setup)
            }
            (Aes192Cfb, Direction::Decrypt) => {
                block_mode::cfb_stream::<cfb_mode::BufDecryptor<Aes192>>(setup)
            }
            (Aes256Cfb, Direction::Decrypt) => {
                block_mode::cfb_stream::<cfb_mode::BufDecryptor<Aes256>>(setup)
            }
        }
    }

    fn digest(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Primitive>> {
        Ok(match algorithm {
            DigestAlgorithm::Sha1 => hash::engine::<sha1::Sha1>(),
            DigestAlgorithm::Sha224 => hash::engine::<sha2::Sha224>(),
            DigestAlgorithm::Sha256 => hash::engine::<sha2::Sha256>(),
            DigestAlgorithm::Sha384 => hash::engine::<sha2::Sha384>(),
            DigestAlgorithm::Sha512 => hash::engine::<sha2::Sha512>(),
        })
    }
}

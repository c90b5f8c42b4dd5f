//! Seam between the operation state machine and the crypto library doing the math.

pub mod variant;

use crate::error::Result;
use variant::{CipherVariant, DigestAlgorithm, Direction, AES_BLOCK_LEN};

/// An engine for a single cipher or hash run, exclusively owned by one operation.
///
/// Ciphers append the transformed bytes to `output` as soon as they are available.
/// Hashes append nothing on [`Primitive::update`] and the digest on [`Primitive::finalize`].
pub trait Primitive: Send {
    /// feeds the next chunk of input
    fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()>;

    /// flushes the remaining output, e.g. the padded last block or the digest
    fn finalize(self: Box<Self>, output: &mut Vec<u8>) -> Result<()>;
}

/// Everything a provider needs to key a cipher engine
#[derive(Debug, Clone, Copy)]
pub struct CipherSetup<'a> {
    /// which cipher and mode
    pub variant: CipherVariant,
    /// encrypt or decrypt
    pub direction: Direction,
    /// raw key, its length matches [`CipherVariant::key_len`]
    pub key: &'a [u8],
    /// initialization vector
    pub iv: &'a [u8; AES_BLOCK_LEN],
    /// PKCS#7 padding for block modes, ignored by stream modes
    pub padding: bool,
}

/// Factory for primitive engines, implemented once per crypto backend.
/// A backend lacking a primitive fails with [`crate::error::CryptoError::UnsupportedAlgorithm`].
pub trait CryptoProvider {
    /// creates a keyed cipher engine
    fn cipher(&self, setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>>;

    /// creates a fresh hash engine
    fn digest(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Primitive>>;
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "rust-crypto", not(feature = "openssl"), not(feature = "ring")))] {
        pub mod rust_crypto;
        /// Provider of the compiled in crypto backend (RustCrypto)
        pub type DefaultProvider = rust_crypto::RustCrypto;
    } else if #[cfg(all(feature = "openssl", not(feature = "rust-crypto"), not(feature = "ring")))] {
        pub mod openssl;
        /// Provider of the compiled in crypto backend (OpenSSL)
        pub type DefaultProvider = self::openssl::Openssl;
    } else if #[cfg(all(feature = "ring", not(feature = "rust-crypto"), not(feature = "openssl")))] {
        pub mod ring;
        /// Provider of the compiled in crypto backend (ring)
        pub type DefaultProvider = self::ring::Ring;
    } else {
        compile_error!("Exactly one crypto backend (rust-crypto, openssl, ring) has to be configured.");
    }
}

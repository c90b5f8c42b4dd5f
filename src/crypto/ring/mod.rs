//! Ring backend implementation.
//!
//! ring has no unauthenticated block cipher modes and no SHA-224,
//! those requests fail with [`CryptoError::UnsupportedAlgorithm`].

use crate::{
    crypto::{variant::DigestAlgorithm, CipherSetup, CryptoProvider, Primitive},
    error::{CryptoError, Result},
};

/// Crypto provider using the ring library, digests only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ring;

impl CryptoProvider for Ring {
    fn cipher(&self, setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>> {
        log::debug!("Cipher {:?} requested from the ring backend", setup.variant);
        Err(CryptoError::UnsupportedAlgorithm(format!(
            "{:?} is not supported by this backend",
            setup.variant
        )))
    }

    fn digest(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Primitive>> {
        let ring_algorithm: &'static ring::digest::Algorithm = match algorithm {
            DigestAlgorithm::Sha1 => &ring::digest::SHA1_FOR_LEGACY_USE_ONLY,
            DigestAlgorithm::Sha256 => &ring::digest::SHA256,
            DigestAlgorithm::Sha384 => &ring::digest::SHA384,
            DigestAlgorithm::Sha512 => &ring::digest::SHA512,
            DigestAlgorithm::Sha224 => {
                return Err(CryptoError::UnsupportedAlgorithm(format!(
                    "{algorithm:?} is not supported by this backend"
                )))
            }
        };

        Ok(Box::new(DigestContext {
            context: ring::digest::Context::new(ring_algorithm),
        }))
    }
}

struct DigestContext {
    context: ring::digest::Context,
}

impl Primitive for DigestContext {
    fn update(&mut self, input: &[u8], _output: &mut Vec<u8>) -> Result<()> {
        self.context.update(input);
        Ok(())
    }

    fn finalize(self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
        output.extend_from_slice(self.context.finish().as_ref());
        Ok(())
    }
}

//! Incremental CBC and CFB engines on top of the `cbc` and `cfb-mode` crates.
//!
//! The mode crates work on complete blocks only, so CBC keeps the trailing
//! partial block until more input arrives, and handles the PKCS#7 padding itself.

use cipher::{
    block_padding::{Pkcs7, RawPadding},
    generic_array::GenericArray,
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use subtle::ConstantTimeEq;

use crate::{
    crypto::{variant::AES_BLOCK_LEN, CipherSetup, Primitive},
    error::{CryptoError, Result},
};

fn keyed<M>(setup: &CipherSetup<'_>) -> Result<M>
where
    M: KeyIvInit,
{
    M::new_from_slices(setup.key, setup.iv).map_err(|err| {
        log::debug!("Could not key {:?}: {err}", setup.variant);
        CryptoError::InvalidParameter(err.to_string())
    })
}

pub(super) fn cbc_encryptor<E>(setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>>
where
    E: KeyIvInit + BlockEncryptMut + Send + 'static,
{
    Ok(Box::new(CbcEncryptor {
        mode: keyed::<E>(&setup)?,
        pending: Vec::with_capacity(AES_BLOCK_LEN),
        padding: setup.padding,
    }))
}

pub(super) fn cbc_decryptor<D>(setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>>
where
    D: KeyIvInit + BlockDecryptMut + Send + 'static,
{
    Ok(Box::new(CbcDecryptor {
        mode: keyed::<D>(&setup)?,
        pending: Vec::with_capacity(2 * AES_BLOCK_LEN),
        padding: setup.padding,
    }))
}

pub(super) fn cfb_stream<T>(setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>>
where
    T: KeyIvInit + StreamTransform + Send + 'static,
{
    Ok(Box::new(CfbStream {
        mode: keyed::<T>(&setup)?,
    }))
}

struct CbcEncryptor<E> {
    mode: E,
    pending: Vec<u8>,
    padding: bool,
}

impl<E> Primitive for CbcEncryptor<E>
where
    E: BlockEncryptMut + Send,
{
    fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
        self.pending.extend_from_slice(input);
        let complete = self.pending.len() - self.pending.len() % AES_BLOCK_LEN;

        let start = output.len();
        output.extend(self.pending.drain(..complete));
        encrypt_blocks(&mut self.mode, &mut output[start..]);

        Ok(())
    }

    fn finalize(mut self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
        if self.padding {
            let pos = self.pending.len();
            self.pending.resize(AES_BLOCK_LEN, 0);
            Pkcs7::raw_pad(&mut self.pending, pos);
        } else if !self.pending.is_empty() {
            log::warn!(
                "CBC without padding: {} trailing bytes do not fill a block",
                self.pending.len()
            );
            return Err(not_block_aligned());
        }

        let start = output.len();
        output.append(&mut self.pending);
        encrypt_blocks(&mut self.mode, &mut output[start..]);

        Ok(())
    }
}

struct CbcDecryptor<D> {
    mode: D,
    pending: Vec<u8>,
    padding: bool,
}

impl<D> Primitive for CbcDecryptor<D>
where
    D: BlockDecryptMut + Send,
{
    fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
        self.pending.extend_from_slice(input);
        let mut complete = self.pending.len() - self.pending.len() % AES_BLOCK_LEN;
        // the last block carries the padding, it is only released by finalize
        if self.padding && complete == self.pending.len() {
            complete = complete.saturating_sub(AES_BLOCK_LEN);
        }

        let start = output.len();
        output.extend(self.pending.drain(..complete));
        decrypt_blocks(&mut self.mode, &mut output[start..]);

        Ok(())
    }

    fn finalize(mut self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
        if !self.padding {
            return if self.pending.is_empty() {
                Ok(())
            } else {
                Err(not_block_aligned())
            };
        }

        if self.pending.len() != AES_BLOCK_LEN {
            log::debug!(
                "CBC decryption ends with {} pending bytes instead of a full block",
                self.pending.len()
            );
            return Err(CryptoError::OperationFailure(
                "wrong final block length".into(),
            ));
        }

        let mut last_block = std::mem::take(&mut self.pending);
        decrypt_blocks(&mut self.mode, &mut last_block);
        let plain_len = unpadded_len(&last_block)?;
        output.extend_from_slice(&last_block[..plain_len]);

        Ok(())
    }
}

fn encrypt_blocks<E>(mode: &mut E, blocks: &mut [u8])
where
    E: BlockEncryptMut,
{
    for block in blocks.chunks_exact_mut(AES_BLOCK_LEN) {
        mode.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

fn decrypt_blocks<D>(mode: &mut D, blocks: &mut [u8])
where
    D: BlockDecryptMut,
{
    for block in blocks.chunks_exact_mut(AES_BLOCK_LEN) {
        mode.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
}

fn unpadded_len(block: &[u8]) -> Result<usize> {
    let pad = block.last().copied().unwrap_or_default();

    // the range check may return early, the padding bytes are compared in constant time
    if pad == 0 || usize::from(pad) > block.len().min(AES_BLOCK_LEN) {
        return Err(bad_decrypt());
    }

    let start = block.len() - usize::from(pad);
    let expected = [pad; AES_BLOCK_LEN];
    if !bool::from(block[start..].ct_eq(&expected[..usize::from(pad)])) {
        return Err(bad_decrypt());
    }

    Ok(start)
}

fn bad_decrypt() -> CryptoError {
    log::debug!("Invalid PKCS#7 padding in the last block");
    CryptoError::OperationFailure("bad decrypt".into())
}

fn not_block_aligned() -> CryptoError {
    CryptoError::OperationFailure("data not multiple of block length".into())
}

/// CFB engines of the `cfb-mode` crate, which already work on arbitrary lengths
pub(super) trait StreamTransform {
    fn apply(&mut self, data: &mut [u8]);
}

impl<C> StreamTransform for cfb_mode::BufEncryptor<C>
where
    C: BlockEncryptMut + BlockCipher,
{
    fn apply(&mut self, data: &mut [u8]) {
        self.encrypt(data);
    }
}

impl<C> StreamTransform for cfb_mode::BufDecryptor<C>
where
    C: BlockEncryptMut + BlockCipher,
{
    fn apply(&mut self, data: &mut [u8]) {
        self.decrypt(data);
    }
}

struct CfbStream<T> {
    mode: T,
}

impl<T> Primitive for CfbStream<T>
where
    T: StreamTransform + Send,
{
    fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
        let start = output.len();
        output.extend_from_slice(input);
        self.mode.apply(&mut output[start..]);

        Ok(())
    }

    fn finalize(self: Box<Self>, _output: &mut Vec<u8>) -> Result<()> {
        Ok(())
    }
}

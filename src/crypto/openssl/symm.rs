use openssl::symm::Crypter;

use crate::{
    crypto::{CipherSetup, Primitive},
    error::Result,
};

pub(super) fn engine(setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>> {
    let cipher: openssl::symm::Cipher = setup.variant.into();
    let mut crypter = Crypter::new(
        cipher,
        setup.direction.into(),
        setup.key,
        Some(setup.iv.as_slice()),
    )?;
    crypter.pad(setup.padding);

    Ok(Box::new(CrypterEngine {
        crypter,
        block_len: cipher.block_size(),
    }))
}

struct CrypterEngine {
    crypter: Crypter,
    block_len: usize,
}

impl Primitive for CrypterEngine {
    fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
        // openssl wants room for one extra block in the output
        // TODO write into the spare capacity of `output` instead of allocating
        let mut buffer = vec![0; input.len() + self.block_len];
        let written = self.crypter.update(input, &mut buffer)?;
        output.extend_from_slice(&buffer[..written]);

        Ok(())
    }

    fn finalize(mut self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
        let mut buffer = vec![0; self.block_len];
        let written = self.crypter.finalize(&mut buffer)?;
        output.extend_from_slice(&buffer[..written]);

        Ok(())
    }
}

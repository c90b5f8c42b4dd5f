use openssl::hash::{Hasher, MessageDigest};

use crate::{crypto::Primitive, error::Result};

pub(super) fn engine(digest: MessageDigest) -> Result<Box<dyn Primitive>> {
    Ok(Box::new(HasherEngine {
        hasher: Hasher::new(digest)?,
    }))
}

struct HasherEngine {
    hasher: Hasher,
}

impl Primitive for HasherEngine {
    fn update(&mut self, input: &[u8], _output: &mut Vec<u8>) -> Result<()> {
        self.hasher.update(input)?;
        Ok(())
    }

    fn finalize(mut self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
        let digest = self.hasher.finish()?;
        output.extend_from_slice(&digest);
        Ok(())
    }
}

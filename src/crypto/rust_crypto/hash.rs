use sha2::Digest;

use crate::{crypto::Primitive, error::Result};

pub(super) fn engine<D>() -> Box<dyn Primitive>
where
    D: Digest + Send + 'static,
{
    Box::new(HashEngine { hasher: D::new() })
}

struct HashEngine<D> {
    hasher: D,
}

impl<D> Primitive for HashEngine<D>
where
    D: Digest + Send,
{
    fn update(&mut self, input: &[u8], _output: &mut Vec<u8>) -> Result<()> {
        self.hasher.update(input);
        Ok(())
    }

    fn finalize(self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
        output.extend_from_slice(&self.hasher.finalize());
        Ok(())
    }
}

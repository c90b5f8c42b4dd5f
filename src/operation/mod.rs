//! Incremental crypto operations (encrypt, decrypt, digest).
//!
//! An operation runs through `Created -> Processing (0..n) -> Finished`, or ends
//! early in `Aborted` or `Failed`. There are no backward transitions.

mod crypto_operation;
mod events;

pub use crypto_operation::CryptoOperation;
pub use events::{EventKind, OperationEvent};

use crate::error::Result;

/// Lifecycle state of an operation
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum OperationState {
    /// primed, no input processed yet
    Created,
    /// at least one chunk of input processed
    Processing,
    /// the result is available
    Finished,
    /// aborted by the caller
    Aborted,
    /// the primitive reported an error
    Failed,
}

impl OperationState {
    /// whether the operation still accepts input
    pub fn is_running(&self) -> bool {
        matches!(self, OperationState::Created | OperationState::Processing)
    }
}

/// What an operation computes
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum OperationKind {
    /// cipher text from plain text
    Encrypt,
    /// plain text from cipher text
    Decrypt,
    /// hash of the input
    Digest,
}

/// Common interface of incremental operations.
///
/// Calls have to be serialized per operation, `&mut self` takes care of that.
pub trait Operation {
    /// Feeds the next chunk of input. Chunks are applied in call order.
    /// Fails with [`crate::error::CryptoError::InvalidState`] once the operation is no longer running.
    fn process(&mut self, buffer: &[u8]) -> Result<&mut Self>;

    /// Flushes the primitive and publishes the result.
    /// Fails with [`crate::error::CryptoError::InvalidState`] once the operation is no longer running.
    fn finish(&mut self) -> Result<&mut Self>;

    /// Stops a running operation and discards its partial output. Idempotent.
    fn abort(&mut self) -> &mut Self;

    /// the current lifecycle state
    fn state(&self) -> OperationState;

    /// the result, available once [`OperationState::Finished`]
    fn result(&self) -> Option<&[u8]>;
}

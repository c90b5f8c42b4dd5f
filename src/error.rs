use crate::operation::OperationState;

/// Represents either success(T) or an failure ([`CryptoError`])
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Represents an error which has occured in the webcrypto-ops library
#[derive(PartialEq, Eq, Clone, Debug, thiserror::Error)]
pub enum CryptoError {
    /// algorithm name or algorithm/key length combination is not recognized
    /// by the requested operation or by the compiled crypto backend
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// key import/export format other than `raw`
    #[error("Unsupported key format: {0}")]
    UnsupportedKeyFormat(String),

    /// a required algorithm parameter (e.g. the IV) is absent
    #[error("Missing algorithm parameter: {0}")]
    MissingParameter(&'static str),

    /// an algorithm parameter is present but malformed
    #[error("Invalid algorithm parameter: {0}")]
    InvalidParameter(String),

    /// export attempted on a key which was imported as not extractable
    #[error("Key is not extractable")]
    KeyNotExtractable,

    /// the key does not permit the requested operation
    #[error("{0}")]
    InvalidAccess(String),

    /// operation method called out of sequence
    #[error("Invalid operation state: expected {expected}, was {actual:?}")]
    InvalidState {
        /// what the called method requires
        expected: &'static str,
        /// the state the operation was in
        actual: OperationState,
    },

    /// the underlying primitive failed while processing, e.g. bad padding
    #[error("Operation failed: {0}")]
    OperationFailure(String),
}

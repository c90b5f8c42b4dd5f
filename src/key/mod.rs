//! Key container holding imported secret key material and its usage policy.
//!
//! Keys are immutable once imported, so a [`CryptoKey`] can be shared by
//! reference between any number of operations, also across threads.

/// Secret key container with import and export
pub mod crypto_key;
mod format;
mod usage;

pub use crypto_key::{CryptoKey, KeyType};
pub use format::KeyFormat;
pub use usage::KeyUsage;

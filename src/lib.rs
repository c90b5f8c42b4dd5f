//! # WebCrypto operations
//! Incremental symmetric encryption, decryption and hashing modelled after the
//! [W3C Web Cryptography API](https://www.w3.org/TR/WebCryptoAPI/).
//!
//! Operations are created through [`SubtleCrypto`] (or the free functions of this crate),
//! fed chunk by chunk with [`Operation::process`] and completed with [`Operation::finish`].
//! Progress, completion, abort and errors are reported as [`OperationEvent`]s.
//!
//! Supported algorithms:
//! - `AES-CBC` and `AES-CFB` with 128, 192 and 256 bit keys and a 16 byte IV
//! - `SHA-1`, `SHA-224`, `SHA-256`, `SHA-384`, `SHA-512`
//!
//! Keys are imported and exported in the `raw` format only.
//!
//! # Optional features
//!
//! The crypto backend is selected by features which are mutually exclusive,
//! if multiple are configured the crate issues a compiler error.
//!
//! - **`rust-crypto`** *(enabled by default)*: Uses the pure Rust [RustCrypto](https://github.com/RustCrypto) crates.
//! - **`openssl`**: Uses the [rust-openssl](https://crates.io/crates/openssl) crate, which provides bindings to OpenSSL.
//! Per default the OpenSSL library is locally compiled and then statically linked. The build process requires a C compiler,
//! `perl` (and `perl-core`), and `make`.
//! - **`ring`**: Uses the [ring](https://crates.io/crates/ring) library which allows compilation to Wasm32.
//! Only digests are available, and `SHA-224` is not supported.

#![deny(clippy::missing_panics_doc)]
#![deny(
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
#![warn(
    // missing_docs,
    clippy::doc_markdown,
    clippy::semicolon_if_nothing_returned,
    clippy::single_match_else,
    clippy::inconsistent_struct_constructor,
    clippy::map_unwrap_or,
    clippy::match_same_arms
)]

/// algorithm identifiers and their normalization
pub mod algorithm;
/// binary string and hex helpers for byte buffers
pub mod codec;
/// provider seam and the compiled in crypto backend
pub mod crypto;
/// error definitions
pub mod error;
/// key container, formats and usages
pub mod key;
/// incremental operations and their notifications
pub mod operation;
/// factory creating operations and handling keys
pub mod subtle;

#[cfg(test)]
mod util;

pub use algorithm::{AlgorithmIdentifier, AlgorithmName, AlgorithmParams};
pub use crypto::{CryptoProvider, DefaultProvider, Primitive};
pub use error::{CryptoError, Result};
pub use key::{CryptoKey, KeyFormat, KeyUsage};
pub use operation::{CryptoOperation, EventKind, Operation, OperationEvent, OperationState};
pub use self::subtle::{SubtleCrypto, SubtleOptions};

/// Creates an encrypt operation using the [`DefaultProvider`], see [`SubtleCrypto::encrypt`].
pub fn encrypt<A>(algorithm: A, key: &CryptoKey, buffer: Option<&[u8]>) -> Result<CryptoOperation>
where
    A: Into<AlgorithmIdentifier>,
{
    SubtleCrypto::<DefaultProvider>::default().encrypt(algorithm, key, buffer)
}

/// Creates a decrypt operation using the [`DefaultProvider`], see [`SubtleCrypto::decrypt`].
pub fn decrypt<A>(algorithm: A, key: &CryptoKey, buffer: Option<&[u8]>) -> Result<CryptoOperation>
where
    A: Into<AlgorithmIdentifier>,
{
    SubtleCrypto::<DefaultProvider>::default().decrypt(algorithm, key, buffer)
}

/// Creates a digest operation using the [`DefaultProvider`], see [`SubtleCrypto::digest`].
pub fn digest<A>(algorithm: A, buffer: Option<&[u8]>) -> Result<CryptoOperation>
where
    A: Into<AlgorithmIdentifier>,
{
    SubtleCrypto::<DefaultProvider>::default().digest(algorithm, buffer)
}

/// Imports key material, see [`CryptoKey::import`].
pub fn import_key<D, A, U>(
    format: KeyFormat,
    key_data: D,
    algorithm: A,
    extractable: bool,
    usages: U,
) -> Result<CryptoKey>
where
    D: AsRef<[u8]>,
    A: Into<AlgorithmIdentifier>,
    U: IntoIterator<Item = KeyUsage>,
{
    CryptoKey::import(format, key_data, algorithm, extractable, usages)
}

/// Exports key material, see [`CryptoKey::export`].
pub fn export_key(format: KeyFormat, key: &CryptoKey) -> Result<Vec<u8>> {
    key.export(format)
}

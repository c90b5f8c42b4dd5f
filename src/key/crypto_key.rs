use std::{collections::BTreeSet, fmt};

use zeroize::Zeroizing;

use crate::{
    algorithm::{normalize, AlgorithmIdentifier, AlgorithmParams},
    error::{CryptoError, Result},
    key::{KeyFormat, KeyUsage},
};

/// kind of key material
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyType {
    /// symmetric secret
    Secret,
}

/// Imported secret key material together with its usage policy.
///
/// The raw bytes are exclusively owned by the container, never change after
/// import and are zeroed when the container is dropped.
#[derive(Clone)]
pub struct CryptoKey {
    data: Zeroizing<Vec<u8>>,
    key_type: KeyType,
    extractable: bool,
    algorithm: AlgorithmParams,
    usages: BTreeSet<KeyUsage>,
}

impl CryptoKey {
    /// Imports key material in the given format, copying it into the container.
    /// May fail with
    /// - [`CryptoError::UnsupportedKeyFormat`] for anything but [`KeyFormat::Raw`]
    /// - [`CryptoError::UnsupportedAlgorithm`] if the algorithm does not normalize
    pub fn import<D, A, U>(
        format: KeyFormat,
        key_data: D,
        algorithm: A,
        extractable: bool,
        usages: U,
    ) -> Result<Self>
    where
        D: AsRef<[u8]>,
        A: Into<AlgorithmIdentifier>,
        U: IntoIterator<Item = KeyUsage>,
    {
        let algorithm = normalize(algorithm)?;

        let data = match format {
            KeyFormat::Raw => Zeroizing::new(key_data.as_ref().to_vec()),
            other => return Err(CryptoError::UnsupportedKeyFormat(other.to_string())),
        };

        let usages: BTreeSet<_> = usages.into_iter().collect();
        log::debug!(
            "Imported {} byte {} key, extractable: {extractable}, usages: {usages:?}",
            data.len(),
            algorithm.name,
        );

        Ok(Self {
            data,
            key_type: KeyType::Secret,
            extractable,
            algorithm,
            usages,
        })
    }

    /// Exports a copy of the key material in the given format.
    /// May fail with
    /// - [`CryptoError::KeyNotExtractable`], checked before anything else
    /// - [`CryptoError::UnsupportedKeyFormat`] for anything but [`KeyFormat::Raw`]
    pub fn export(&self, format: KeyFormat) -> Result<Vec<u8>> {
        if !self.extractable {
            log::debug!("Refusing to export a non extractable key");
            return Err(CryptoError::KeyNotExtractable);
        }

        match format {
            KeyFormat::Raw => Ok(self.data.to_vec()),
            other => Err(CryptoError::UnsupportedKeyFormat(other.to_string())),
        }
    }

    /// the kind of key material, always [`KeyType::Secret`]
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// whether [`CryptoKey::export`] may hand out the key material
    pub fn extractable(&self) -> bool {
        self.extractable
    }

    /// the algorithm the key was imported for
    pub fn algorithm(&self) -> &AlgorithmParams {
        &self.algorithm
    }

    /// the permitted usages
    pub fn usages(&self) -> &BTreeSet<KeyUsage> {
        &self.usages
    }

    /// whether the key may be used for `usage`
    pub fn has_usage(&self, usage: KeyUsage) -> bool {
        self.usages.contains(&usage)
    }

    pub(crate) fn require_usage(&self, usage: KeyUsage) -> Result<()> {
        if self.has_usage(usage) {
            Ok(())
        } else {
            Err(CryptoError::InvalidAccess(format!(
                "key usages {:?} do not permit {usage}",
                self.usages
            )))
        }
    }

    pub(crate) fn raw(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("data", &format_args!("<{} bytes redacted>", self.data.len()))
            .field("key_type", &self.key_type)
            .field("extractable", &self.extractable)
            .field("algorithm", &self.algorithm.name)
            .field("usages", &self.usages)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::AlgorithmName;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const RAW_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];

    fn import(extractable: bool) -> CryptoKey {
        CryptoKey::import(
            KeyFormat::Raw,
            RAW_KEY,
            "AES-CBC",
            extractable,
            [KeyUsage::Encrypt, KeyUsage::Decrypt],
        )
        .unwrap()
    }

    #[test]
    fn export_returns_imported_bytes() {
        let key = import(true);
        assert_eq!(key.export(KeyFormat::Raw).unwrap(), RAW_KEY.to_vec());
    }

    #[test]
    fn import_copies_key_data() {
        let mut caller_buffer = RAW_KEY.to_vec();
        let key = CryptoKey::import(
            KeyFormat::Raw,
            &caller_buffer,
            "AES-CFB",
            true,
            [KeyUsage::Encrypt],
        )
        .unwrap();

        caller_buffer.fill(0);
        assert_eq!(key.raw(), RAW_KEY.as_slice());
    }

    #[test]
    fn import_records_metadata() {
        let key = import(false);
        assert_eq!(key.key_type(), KeyType::Secret);
        assert!(!key.extractable());
        assert_eq!(key.algorithm(), &AlgorithmParams::new(AlgorithmName::AesCbc));
        assert!(key.has_usage(KeyUsage::Encrypt));
        assert!(key.has_usage(KeyUsage::Decrypt));
        assert!(!key.has_usage(KeyUsage::Sign));
    }

    #[test]
    fn deduplicate_usages() {
        let key = CryptoKey::import(
            KeyFormat::Raw,
            RAW_KEY,
            "AES-CBC",
            true,
            [KeyUsage::Decrypt, KeyUsage::Encrypt, KeyUsage::Decrypt],
        )
        .unwrap();
        assert_eq!(key.usages().len(), 2);
    }

    #[test]
    fn refuse_export_of_non_extractable_key() {
        let key = import(false);
        assert_eq!(
            key.export(KeyFormat::Raw),
            Err(CryptoError::KeyNotExtractable)
        );
        // extractability is checked before the format
        assert_eq!(
            key.export(KeyFormat::Jwk),
            Err(CryptoError::KeyNotExtractable)
        );
    }

    #[test_case(KeyFormat::Pkcs8; "pkcs8")]
    #[test_case(KeyFormat::Spki; "spki")]
    #[test_case(KeyFormat::Jwk; "jwk")]
    fn reject_non_raw_formats(format: KeyFormat) {
        let import_result =
            CryptoKey::import(format, RAW_KEY, "AES-CBC", true, [KeyUsage::Encrypt]);
        assert!(matches!(
            import_result,
            Err(CryptoError::UnsupportedKeyFormat(_))
        ));

        assert_eq!(
            import(true).export(format),
            Err(CryptoError::UnsupportedKeyFormat(format.to_string()))
        );
    }

    #[test]
    fn reject_unknown_algorithm() {
        let result = CryptoKey::import(KeyFormat::Raw, RAW_KEY, "AES-KW", true, [KeyUsage::WrapKey]);
        assert_eq!(
            result.map(|_| ()),
            Err(CryptoError::UnsupportedAlgorithm("AES-KW".into()))
        );
    }

    #[test]
    fn check_usage() {
        let key = CryptoKey::import(KeyFormat::Raw, RAW_KEY, "AES-CBC", true, [KeyUsage::Decrypt])
            .unwrap();
        assert!(key.require_usage(KeyUsage::Decrypt).is_ok());
        assert!(matches!(
            key.require_usage(KeyUsage::Encrypt),
            Err(CryptoError::InvalidAccess(_))
        ));
    }

    #[test]
    fn debug_output_hides_key_data() {
        let debug = format!("{:?}", import(true));
        assert!(debug.contains("16 bytes redacted"));
        assert!(!debug.contains("[43, 126"));
    }
}

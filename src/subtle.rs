use crate::{
    algorithm::{normalize, AlgorithmIdentifier, CipherParams},
    crypto::{
        variant::{CipherVariant, DigestAlgorithm, Direction},
        CipherSetup, CryptoProvider, DefaultProvider,
    },
    error::{CryptoError, Result},
    key::{CryptoKey, KeyFormat, KeyUsage},
    operation::{CryptoOperation, OperationKind},
};

/// options for the operation factories,
/// allows to create a [`SubtleCrypto`] object using [Into]/[From]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubtleOptions {
    /// PKCS#7 padding for AES-CBC. Without it the input has to be a multiple of the block size.
    ///
    /// default: `true`
    pub padding: bool,
    /// whether operations emit an [`crate::operation::OperationEvent::Progress`] per processed chunk
    ///
    /// default: `true`
    pub progress_events: bool,
}

impl Default for SubtleOptions {
    fn default() -> Self {
        Self {
            padding: true,
            progress_events: true,
        }
    }
}

/// Entry point creating crypto operations and handling keys.
///
/// Generic over the [`CryptoProvider`] doing the actual math, which defaults to the
/// backend selected by the cargo features.
#[derive(Clone, Debug)]
pub struct SubtleCrypto<P = DefaultProvider> {
    provider: P,
    options: SubtleOptions,
}

impl<P> SubtleCrypto<P>
where
    P: CryptoProvider,
{
    /// creates a factory using the given provider and the default options
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, SubtleOptions::default())
    }

    /// creates a factory using the given provider and options
    pub fn with_options(provider: P, options: SubtleOptions) -> Self {
        log::debug!("Setting up SubtleCrypto with {options:?}");
        Self { provider, options }
    }

    /// the options operations are created with
    pub fn options(&self) -> &SubtleOptions {
        &self.options
    }

    /// Creates an encrypt operation. If `buffer` is given it is processed and the
    /// operation finished before returning.
    /// May fail with
    /// - [`CryptoError::UnsupportedAlgorithm`]
    /// - [`CryptoError::MissingParameter`]
    /// - [`CryptoError::InvalidParameter`]
    /// - [`CryptoError::InvalidAccess`] if the key lacks the `encrypt` usage or was imported
    ///   for another algorithm than the one requested
    pub fn encrypt<A>(
        &self,
        algorithm: A,
        key: &CryptoKey,
        buffer: Option<&[u8]>,
    ) -> Result<CryptoOperation>
    where
        A: Into<AlgorithmIdentifier>,
    {
        self.cipher_operation(Direction::Encrypt, algorithm.into(), key, buffer)
    }

    /// Creates a decrypt operation, see [`SubtleCrypto::encrypt`].
    pub fn decrypt<A>(
        &self,
        algorithm: A,
        key: &CryptoKey,
        buffer: Option<&[u8]>,
    ) -> Result<CryptoOperation>
    where
        A: Into<AlgorithmIdentifier>,
    {
        self.cipher_operation(Direction::Decrypt, algorithm.into(), key, buffer)
    }

    /// Creates a digest operation. If `buffer` is given it is processed and the
    /// operation finished before returning.
    /// Fails with [`CryptoError::UnsupportedAlgorithm`] for names other than the SHA family,
    /// or if the backend lacks the hash function.
    pub fn digest<A>(&self, algorithm: A, buffer: Option<&[u8]>) -> Result<CryptoOperation>
    where
        A: Into<AlgorithmIdentifier>,
    {
        let algorithm = normalize(algorithm)?;
        let digest_algorithm = DigestAlgorithm::try_from(&algorithm)?;
        let engine = self.provider.digest(digest_algorithm)?;

        let operation = CryptoOperation::new(
            OperationKind::Digest,
            algorithm,
            engine,
            self.options.progress_events,
        );
        match buffer {
            Some(buffer) => operation.complete_with(buffer),
            None => Ok(operation),
        }
    }

    /// Imports key material, see [`CryptoKey::import`].
    pub fn import_key<D, A, U>(
        &self,
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
    pub fn export_key(&self, format: KeyFormat, key: &CryptoKey) -> Result<Vec<u8>> {
        key.export(format)
    }

    fn cipher_operation(
        &self,
        direction: Direction,
        algorithm: AlgorithmIdentifier,
        key: &CryptoKey,
        buffer: Option<&[u8]>,
    ) -> Result<CryptoOperation> {
        let (kind, usage) = match direction {
            Direction::Encrypt => (OperationKind::Encrypt, KeyUsage::Encrypt),
            Direction::Decrypt => (OperationKind::Decrypt, KeyUsage::Decrypt),
        };

        let algorithm = normalize(algorithm)?;
        let params = CipherParams::try_from(&algorithm)?;

        if key.algorithm().name != algorithm.name {
            return Err(CryptoError::InvalidAccess(format!(
                "key was imported for {}, not {}",
                key.algorithm().name,
                algorithm.name
            )));
        }
        key.require_usage(usage)?;

        let variant = CipherVariant::select(params.mode, key.raw().len())?;
        log::trace!("Selected {variant:?} for {kind:?}");

        let engine = self.provider.cipher(CipherSetup {
            variant,
            direction,
            key: key.raw(),
            iv: &params.iv,
            padding: self.options.padding,
        })?;

        let operation =
            CryptoOperation::new(kind, algorithm, engine, self.options.progress_events);
        match buffer {
            Some(buffer) => operation.complete_with(buffer),
            None => Ok(operation),
        }
    }
}

impl<P> Default for SubtleCrypto<P>
where
    P: CryptoProvider + Default,
{
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl From<SubtleOptions> for SubtleCrypto {
    fn from(options: SubtleOptions) -> Self {
        Self::with_options(DefaultProvider::default(), options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        crypto::Primitive,
        operation::{Operation, OperationState},
    };
    use pretty_assertions::assert_eq;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use test_case::test_case;

    /// xors the input with the first key byte, "hashes" by summing up the input
    #[derive(Default)]
    struct FakeProvider {
        calls: Arc<AtomicUsize>,
        without_digests: bool,
    }

    struct XorEngine(u8);

    impl Primitive for XorEngine {
        fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
            output.extend(input.iter().map(|byte| byte ^ self.0));
            Ok(())
        }

        fn finalize(self: Box<Self>, _output: &mut Vec<u8>) -> Result<()> {
            Ok(())
        }
    }

    struct SumEngine(u8);

    impl Primitive for SumEngine {
        fn update(&mut self, input: &[u8], _output: &mut Vec<u8>) -> Result<()> {
            self.0 = input.iter().fold(self.0, |sum, byte| sum.wrapping_add(*byte));
            Ok(())
        }

        fn finalize(self: Box<Self>, output: &mut Vec<u8>) -> Result<()> {
            output.push(self.0);
            Ok(())
        }
    }

    impl CryptoProvider for FakeProvider {
        fn cipher(&self, setup: CipherSetup<'_>) -> Result<Box<dyn Primitive>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(XorEngine(setup.key[0])))
        }

        fn digest(&self, algorithm: DigestAlgorithm) -> Result<Box<dyn Primitive>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.without_digests {
                return Err(CryptoError::UnsupportedAlgorithm(format!("{algorithm:?}")));
            }
            Ok(Box::new(SumEngine(0)))
        }
    }

    fn subtle() -> (SubtleCrypto<FakeProvider>, Arc<AtomicUsize>) {
        let provider = FakeProvider::default();
        let calls = provider.calls.clone();
        (SubtleCrypto::new(provider), calls)
    }

    fn key(algorithm: &str, len: usize, usages: &[KeyUsage]) -> CryptoKey {
        CryptoKey::import(
            KeyFormat::Raw,
            vec![0x5A; len],
            algorithm,
            true,
            usages.iter().copied(),
        )
        .unwrap()
    }

    const BOTH: &[KeyUsage] = &[KeyUsage::Encrypt, KeyUsage::Decrypt];

    #[test]
    fn encrypt_with_initial_buffer_finishes() {
        let (subtle, calls) = subtle();
        let key = key("AES-CBC", 16, BOTH);

        let op = subtle
            .encrypt(
                AlgorithmIdentifier::with_iv("AES-CBC", [0u8; 16]),
                &key,
                Some([0x00, 0xFF].as_slice()),
            )
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(op.state(), OperationState::Finished);
        assert_eq!(op.kind(), OperationKind::Encrypt);
        assert_eq!(op.result(), Some([0x5A, 0xA5].as_slice()));
    }

    #[test]
    fn decrypt_without_buffer_is_primed() {
        let (subtle, _) = subtle();
        let key = key("AES-CFB", 32, BOTH);

        let mut op = subtle
            .decrypt(AlgorithmIdentifier::with_iv("AES-CFB", [0u8; 16]), &key, None)
            .unwrap();
        assert_eq!(op.state(), OperationState::Created);

        op.process(&[0x5A]).unwrap().finish().unwrap();
        assert_eq!(op.into_result(), Ok(vec![0x00]));
    }

    #[test]
    fn missing_iv_fails_before_the_primitive() {
        let (subtle, calls) = subtle();
        let key = key("AES-CBC", 16, BOTH);

        let result = subtle.encrypt("AES-CBC", &key, Some(b"data".as_slice()));

        assert_eq!(
            result.map(|_| ()),
            Err(CryptoError::MissingParameter("iv"))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test_case(8; "too short")]
    #[test_case(17; "odd length")]
    #[test_case(48; "too long")]
    fn reject_key_length(len: usize) {
        let (subtle, calls) = subtle();
        let key = key("AES-CBC", len, BOTH);

        let result = subtle.encrypt(AlgorithmIdentifier::with_iv("AES-CBC", [0u8; 16]), &key, None);

        assert!(matches!(
            result,
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reject_missing_usage() {
        let (subtle, _) = subtle();
        let key = key("AES-CBC", 16, &[KeyUsage::Encrypt]);

        let result = subtle.decrypt(AlgorithmIdentifier::with_iv("AES-CBC", [0u8; 16]), &key, None);

        assert!(matches!(result, Err(CryptoError::InvalidAccess(_))));
    }

    #[test]
    fn reject_key_of_other_algorithm() {
        let (subtle, _) = subtle();
        let key = key("AES-CFB", 16, BOTH);

        let result = subtle.encrypt(AlgorithmIdentifier::with_iv("AES-CBC", [0u8; 16]), &key, None);

        assert!(matches!(result, Err(CryptoError::InvalidAccess(_))));
    }

    #[test]
    fn digest_sums_with_fake_provider() {
        let (subtle, _) = subtle();

        let op = subtle.digest("SHA-256", Some([1, 2, 3].as_slice())).unwrap();

        assert_eq!(op.kind(), OperationKind::Digest);
        assert_eq!(op.into_result(), Ok(vec![6]));
    }

    #[test]
    fn digest_rejects_cipher_names() {
        let (subtle, calls) = subtle();
        assert_eq!(
            subtle.digest("AES-CBC", None).map(|_| ()),
            Err(CryptoError::UnsupportedAlgorithm("AES-CBC".into()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn digest_fails_if_backend_lacks_hash() {
        let subtle = SubtleCrypto::new(FakeProvider {
            without_digests: true,
            ..Default::default()
        });

        assert!(matches!(
            subtle.digest("SHA-224", Some(b"abc".as_slice())),
            Err(CryptoError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn progress_events_follow_options() {
        let subtle = SubtleCrypto::with_options(
            FakeProvider::default(),
            SubtleOptions {
                progress_events: false,
                ..Default::default()
            },
        );
        assert!(!subtle.options().progress_events);
        assert!(subtle.options().padding);

        let mut op = subtle.digest("SHA-1", None).unwrap();
        let events = op.subscribe();
        op.process(b"a").unwrap().finish().unwrap();

        assert_eq!(events.try_iter().count(), 1);
    }

    #[test]
    fn key_round_trip_through_factory() {
        let (subtle, _) = subtle();
        let key = subtle
            .import_key(KeyFormat::Raw, [9u8; 24], "AES-CBC", true, [KeyUsage::Encrypt])
            .unwrap();
        assert_eq!(subtle.export_key(KeyFormat::Raw, &key), Ok(vec![9u8; 24]));
    }
}

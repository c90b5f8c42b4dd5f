use std::sync::mpsc;

use zeroize::Zeroize;

use crate::{
    algorithm::AlgorithmParams,
    crypto::Primitive,
    error::{CryptoError, Result},
    operation::{EventKind, Operation, OperationEvent, OperationKind, OperationState},
};

/// A running encrypt, decrypt or digest operation.
///
/// Created primed by the factories of [`crate::subtle::SubtleCrypto`]. Input is
/// fed with [`Operation::process`], the result is published by [`Operation::finish`].
///
/// Calls out of sequence fail synchronously with [`CryptoError::InvalidState`] and emit nothing.
/// A failing primitive, e.g. on bad padding, does not fail the call: the operation
/// moves to [`OperationState::Failed`] and emits exactly one [`OperationEvent::Error`].
pub struct CryptoOperation {
    kind: OperationKind,
    algorithm: AlgorithmParams,
    state: OperationState,
    engine: Option<Box<dyn Primitive>>,
    output: Vec<u8>,
    processed: usize,
    result: Option<Vec<u8>>,
    error: Option<CryptoError>,
    progress_events: bool,
    notifier: super::events::Notifier,
}

impl CryptoOperation {
    pub(crate) fn new(
        kind: OperationKind,
        algorithm: AlgorithmParams,
        engine: Box<dyn Primitive>,
        progress_events: bool,
    ) -> Self {
        log::debug!("Created {kind:?} operation using {}", algorithm.name);
        Self {
            kind,
            algorithm,
            state: OperationState::Created,
            engine: Some(engine),
            output: Vec::new(),
            processed: 0,
            result: None,
            error: None,
            progress_events,
            notifier: Default::default(),
        }
    }

    /// Processes the whole buffer and finishes right away, on the same state machine.
    /// If the primitive fails on the way the operation is returned in [`OperationState::Failed`].
    pub(crate) fn complete_with(mut self, buffer: &[u8]) -> Result<Self> {
        self.process(buffer)?;
        if self.state.is_running() {
            self.finish()?;
        }
        Ok(self)
    }

    /// Registers a handler for one kind of event. Handlers add up, none replaces another.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> &mut Self
    where
        F: FnMut(&OperationEvent) + Send + 'static,
    {
        self.notifier.on(kind, handler);
        self
    }

    /// Returns a receiver getting every event emitted from now on.
    ///
    /// The channel is unbounded: a receiver which is kept but never drained grows by
    /// one event per [`Operation::process`] call. Drop it to unsubscribe.
    pub fn subscribe(&mut self) -> mpsc::Receiver<OperationEvent> {
        self.notifier.subscribe()
    }

    /// what the operation computes
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// the normalized algorithm the operation runs
    pub fn algorithm(&self) -> &AlgorithmParams {
        &self.algorithm
    }

    /// the error of a [`OperationState::Failed`] operation
    pub fn error(&self) -> Option<&CryptoError> {
        self.error.as_ref()
    }

    /// Consumes the operation, yielding its outcome.
    /// A failed operation yields its error, an unfinished or aborted one [`CryptoError::InvalidState`].
    pub fn into_result(mut self) -> Result<Vec<u8>> {
        if let Some(result) = self.result.take() {
            return Ok(result);
        }
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        Err(CryptoError::InvalidState {
            expected: "a finished operation",
            actual: self.state,
        })
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.is_running() {
            Ok(())
        } else {
            log::debug!("Rejecting call on {:?} operation", self.state);
            Err(CryptoError::InvalidState {
                expected: "a created or processing operation",
                actual: self.state,
            })
        }
    }

    fn take_engine(&mut self) -> Result<Box<dyn Primitive>> {
        self.engine.take().ok_or(CryptoError::InvalidState {
            expected: "an operation holding a primitive",
            actual: self.state,
        })
    }

    fn discard(&mut self) {
        self.engine = None;
        self.output.zeroize();
    }

    fn fail(&mut self, error: CryptoError) {
        log::debug!("{:?} operation failed: {error}", self.kind);
        self.discard();
        self.state = OperationState::Failed;
        self.error = Some(error.clone());
        self.notifier.emit(OperationEvent::Error(error));
    }
}

impl Operation for CryptoOperation {
    fn process(&mut self, buffer: &[u8]) -> Result<&mut Self> {
        self.ensure_running()?;
        let mut engine = self.take_engine()?;

        match engine.update(buffer, &mut self.output) {
            Ok(()) => {
                self.engine = Some(engine);
                self.state = OperationState::Processing;
                self.processed += buffer.len();
                log::trace!(
                    "Processed {} bytes, {} in total",
                    buffer.len(),
                    self.processed
                );

                if self.progress_events {
                    self.notifier.emit(OperationEvent::Progress {
                        processed: self.processed,
                        produced: self.output.len(),
                    });
                }
            }
            Err(error) => self.fail(error),
        }

        Ok(self)
    }

    fn finish(&mut self) -> Result<&mut Self> {
        self.ensure_running()?;
        let engine = self.take_engine()?;

        match engine.finalize(&mut self.output) {
            Ok(()) => {
                let result = std::mem::take(&mut self.output);
                let len = result.len();
                self.result = Some(result);
                self.state = OperationState::Finished;
                log::debug!("{:?} operation finished with {len} bytes", self.kind);

                self.notifier.emit(OperationEvent::Complete { len });
            }
            Err(error) => self.fail(error),
        }

        Ok(self)
    }

    fn abort(&mut self) -> &mut Self {
        if self.state.is_running() {
            self.discard();
            self.state = OperationState::Aborted;
            log::debug!("{:?} operation aborted", self.kind);
            self.notifier.emit(OperationEvent::Abort);
        } else {
            log::trace!("Ignoring abort of {:?} operation", self.state);
        }

        self
    }

    fn state(&self) -> OperationState {
        self.state
    }

    fn result(&self) -> Option<&[u8]> {
        self.result.as_deref()
    }
}

impl std::fmt::Debug for CryptoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoOperation")
            .field("kind", &self.kind)
            .field("algorithm", &self.algorithm.name)
            .field("state", &self.state)
            .field("processed", &self.processed)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::AlgorithmName;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    /// flips every bit, fails on finalize if any input byte was `0xFF`
    struct Inverter {
        saw_poison: bool,
    }

    impl Primitive for Inverter {
        fn update(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<()> {
            self.saw_poison |= input.contains(&0xFF);
            output.extend(input.iter().map(|byte| !byte));
            Ok(())
        }

        fn finalize(self: Box<Self>, _output: &mut Vec<u8>) -> Result<()> {
            if self.saw_poison {
                Err(CryptoError::OperationFailure("poisoned".into()))
            } else {
                Ok(())
            }
        }
    }

    fn operation() -> CryptoOperation {
        CryptoOperation::new(
            OperationKind::Encrypt,
            AlgorithmParams::new(AlgorithmName::AesCfb).with_iv([0u8; 16]),
            Box::new(Inverter { saw_poison: false }),
            true,
        )
    }

    fn record(op: &mut CryptoOperation) -> Arc<Mutex<Vec<OperationEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        for kind in [
            EventKind::Abort,
            EventKind::Error,
            EventKind::Progress,
            EventKind::Complete,
        ] {
            let events = events.clone();
            op.on(kind, move |event| events.lock().unwrap().push(event.clone()));
        }
        events
    }

    #[test]
    fn run_through_lifecycle() {
        let mut op = operation();
        let events = record(&mut op);
        assert_eq!(op.state(), OperationState::Created);

        op.process(&[0x00, 0x0F]).unwrap().process(&[0xF0]).unwrap();
        assert_eq!(op.state(), OperationState::Processing);
        assert_eq!(op.result(), None);

        op.finish().unwrap();
        assert_eq!(op.state(), OperationState::Finished);
        assert_eq!(op.result(), Some([0xFF, 0xF0, 0x0F].as_slice()));

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                OperationEvent::Progress {
                    processed: 2,
                    produced: 2
                },
                OperationEvent::Progress {
                    processed: 3,
                    produced: 3
                },
                OperationEvent::Complete { len: 3 },
            ]
        );
    }

    #[test]
    fn finish_without_input() {
        let mut op = operation();
        op.finish().unwrap();
        let empty: &[u8] = &[];
        assert_eq!(op.result(), Some(empty));
    }

    #[test]
    fn reject_second_finish() {
        let mut op = operation();
        op.process(&[1, 2]).unwrap().finish().unwrap();

        let second = op.finish().map(|_| ());
        assert_eq!(
            second,
            Err(CryptoError::InvalidState {
                expected: "a created or processing operation",
                actual: OperationState::Finished,
            })
        );
        assert_eq!(op.result(), Some([0xFE, 0xFD].as_slice()));
    }

    #[test]
    fn reject_process_after_finish() {
        let mut op = operation();
        op.finish().unwrap();
        assert!(matches!(
            op.process(&[1]),
            Err(CryptoError::InvalidState { .. })
        ));
    }

    #[test]
    fn abort_stops_processing() {
        let mut op = operation();
        let events = record(&mut op);
        op.process(&[1, 2, 3]).unwrap();

        op.abort().abort();
        assert_eq!(op.state(), OperationState::Aborted);
        assert!(matches!(
            op.process(&[4]),
            Err(CryptoError::InvalidState { .. })
        ));
        assert!(matches!(
            op.finish(),
            Err(CryptoError::InvalidState { .. })
        ));
        assert_eq!(op.result(), None);

        let abort_events = events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.kind() == EventKind::Abort)
            .count();
        assert_eq!(abort_events, 1);
    }

    #[test]
    fn abort_keeps_finished_result() {
        let mut op = operation();
        op.process(&[0x0F]).unwrap().finish().unwrap();

        let receiver = op.subscribe();
        op.abort();

        assert_eq!(op.state(), OperationState::Finished);
        assert_eq!(op.result(), Some([0xF0].as_slice()));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn primitive_error_goes_to_error_channel() {
        let mut op = operation();
        let events = record(&mut op);

        op.process(&[0xFF]).unwrap();
        // the call itself succeeds, the failure is reported through the event
        assert!(op.finish().is_ok());

        assert_eq!(op.state(), OperationState::Failed);
        assert_eq!(op.result(), None);
        let failure = CryptoError::OperationFailure("poisoned".into());
        assert_eq!(op.error(), Some(&failure));
        assert_eq!(
            events.lock().unwrap().last(),
            Some(&OperationEvent::Error(failure.clone()))
        );

        assert!(matches!(
            op.process(&[1]),
            Err(CryptoError::InvalidState { .. })
        ));
        assert_eq!(op.into_result(), Err(failure));
    }

    #[test]
    fn complete_with_runs_both_steps() {
        let op = operation().complete_with(&[0x01]).unwrap();
        assert_eq!(op.state(), OperationState::Finished);
        assert_eq!(op.into_result(), Ok(vec![0xFE]));
    }

    #[test]
    fn complete_with_reports_failure_as_state() {
        let op = operation().complete_with(&[0xFF]).unwrap();
        assert_eq!(op.state(), OperationState::Failed);
    }

    #[test]
    fn unfinished_operation_has_no_result() {
        let mut op = operation();
        op.process(&[1]).unwrap();
        assert!(matches!(
            op.into_result(),
            Err(CryptoError::InvalidState {
                actual: OperationState::Processing,
                ..
            })
        ));
    }

    #[test]
    fn progress_events_can_be_disabled() {
        let mut op = CryptoOperation::new(
            OperationKind::Digest,
            AlgorithmParams::new(AlgorithmName::Sha256),
            Box::new(Inverter { saw_poison: false }),
            false,
        );
        let receiver = op.subscribe();

        op.process(&[1]).unwrap().finish().unwrap();

        assert_eq!(
            receiver.try_iter().collect::<Vec<_>>(),
            vec![OperationEvent::Complete { len: 1 }]
        );
    }

    #[test]
    fn operation_moves_across_threads() {
        let mut op = operation();
        op.process(&[0x10]).unwrap();

        let result = std::thread::spawn(move || {
            op.finish().unwrap();
            op.into_result()
        })
        .join()
        .unwrap();

        assert_eq!(result, Ok(vec![0xEF]));
    }
}

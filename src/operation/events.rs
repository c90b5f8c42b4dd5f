use std::{fmt, sync::mpsc};

use crate::error::CryptoError;

/// The four kinds of notifications an operation emits
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EventKind {
    /// the operation was aborted
    Abort,
    /// the primitive failed while processing
    Error,
    /// a chunk of input was processed
    Progress,
    /// the result is available
    Complete,
}

/// Notification emitted by a [`super::CryptoOperation`]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OperationEvent {
    /// the operation was aborted, any partial output is discarded
    Abort,
    /// the primitive failed, the operation is now [`super::OperationState::Failed`]
    Error(CryptoError),
    /// a chunk of input was processed
    Progress {
        /// input bytes consumed so far
        processed: usize,
        /// output bytes accumulated so far
        produced: usize,
    },
    /// the operation finished
    Complete {
        /// length of the result in bytes
        len: usize,
    },
}

impl OperationEvent {
    /// which kind of event this is
    pub fn kind(&self) -> EventKind {
        match self {
            OperationEvent::Abort => EventKind::Abort,
            OperationEvent::Error(_) => EventKind::Error,
            OperationEvent::Progress { .. } => EventKind::Progress,
            OperationEvent::Complete { .. } => EventKind::Complete,
        }
    }
}

type Handler = Box<dyn FnMut(&OperationEvent) + Send>;

/// Delivers events to every registered handler of the matching kind and to every subscriber.
#[derive(Default)]
pub(crate) struct Notifier {
    handlers: Vec<(EventKind, Handler)>,
    subscribers: Vec<mpsc::Sender<OperationEvent>>,
}

impl Notifier {
    pub(crate) fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&OperationEvent) + Send + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
    }

    pub(crate) fn subscribe(&mut self) -> mpsc::Receiver<OperationEvent> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    pub(crate) fn emit(&mut self, event: OperationEvent) {
        let kind = event.kind();
        log::trace!("Emitting {kind:?} event");

        self.handlers
            .iter_mut()
            .filter(|(handler_kind, _)| *handler_kind == kind)
            .for_each(|(_, handler)| handler(&event));

        // receivers which hung up are dropped
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("handlers", &self.handlers.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn deliver_to_every_handler_of_a_kind() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::default();

        for id in 0..2 {
            let seen = seen.clone();
            notifier.on(EventKind::Complete, move |event| {
                seen.lock().unwrap().push((id, event.clone()));
            });
        }
        let errors = seen.clone();
        notifier.on(EventKind::Error, move |event| {
            errors.lock().unwrap().push((99, event.clone()));
        });

        notifier.emit(OperationEvent::Complete { len: 3 });

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (0, OperationEvent::Complete { len: 3 }),
                (1, OperationEvent::Complete { len: 3 })
            ]
        );
    }

    #[test]
    fn prune_hung_up_subscribers() {
        let mut notifier = Notifier::default();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());

        notifier.emit(OperationEvent::Abort);

        assert_eq!(notifier.subscribers.len(), 1);
        assert_eq!(kept.try_recv(), Ok(OperationEvent::Abort));
    }
}

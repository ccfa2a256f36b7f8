//! Registration entry pairing one listener with one event type.

use std::fmt;
use std::sync::Arc;

use super::actions::EventActions;
use super::listener::{ExecutionListener, ListenerKind};
use super::types::ExecutionEvent;
use crate::error::ListenerError;

/// A listener registered for a single event type
///
/// Registering one listener for several types produces one entry per type. Entries are
/// immutable; cloning one only bumps the listener's reference count.
pub struct RegisteredListener<E: ExecutionEvent> {
    event_type: E::EventType,
    kind: ListenerKind,
    listener: Arc<dyn ExecutionListener<E>>,
}

impl<E: ExecutionEvent> RegisteredListener<E> {
    pub fn new(event_type: E::EventType, listener: Arc<dyn ExecutionListener<E>>) -> Self {
        let kind = listener.kind();
        Self {
            event_type,
            kind,
            listener,
        }
    }

    pub fn event_type(&self) -> &E::EventType {
        &self.event_type
    }

    pub fn listener(&self) -> &Arc<dyn ExecutionListener<E>> {
        &self.listener
    }

    /// Kind captured when the entry was created
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Check if this entry should receive events of the given type
    pub fn handles(&self, event_type: &E::EventType) -> bool {
        &self.event_type == event_type
    }

    /// Forward the event to the wrapped listener
    pub fn notify(&self, event: &E) -> Result<EventActions, ListenerError> {
        self.listener.notify(event)
    }
}

impl<E: ExecutionEvent> Clone for RegisteredListener<E> {
    fn clone(&self) -> Self {
        Self {
            event_type: self.event_type.clone(),
            kind: self.kind,
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<E: ExecutionEvent> fmt::Debug for RegisteredListener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredListener")
            .field("event_type", &self.event_type)
            .field("kind", &self.kind)
            .field("listener", &"<Arc<dyn ExecutionListener>>")
            .finish()
    }
}

//! # Execution Listeners
//!
//! A listener is anything that can take an execution event and answer with
//! [`EventActions`]. Plain closures qualify through a blanket implementation.
//!
//! Every listener also has a [`ListenerKind`]: the concrete Rust type that implements
//! the trait. The queue uses it to unregister listeners, which means removal matches
//! *all* instances of a type, not one particular instance.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::actions::EventActions;
use super::types::ExecutionEvent;
use crate::error::ListenerError;

/// Trait for execution event listeners
///
/// Implementations may be invoked from several threads at once when the host engine
/// fires events concurrently.
pub trait ExecutionListener<E: ExecutionEvent>: Send + Sync + 'static {
    /// Handle an event and tell the engine how to proceed
    fn notify(&self, event: &E) -> Result<EventActions, ListenerError>;

    /// Discriminator used to match this listener on removal
    ///
    /// Defaults to the implementing type. Override to make several types unregister
    /// together, or to split one type into independently removable groups.
    fn kind(&self) -> ListenerKind {
        ListenerKind::of::<Self>()
    }

    /// Name used when logging registry operations
    fn listener_name(&self) -> &'static str {
        self.kind().type_name()
    }
}

impl<E, F> ExecutionListener<E> for F
where
    E: ExecutionEvent,
    F: Fn(&E) -> Result<EventActions, ListenerError> + Send + Sync + 'static,
{
    fn notify(&self, event: &E) -> Result<EventActions, ListenerError> {
        self(event)
    }
}

/// Runtime kind of a listener
///
/// Equality and hashing use the type id only; the name is kept for logs.
#[derive(Clone, Copy)]
pub struct ListenerKind {
    type_id: TypeId,
    type_name: &'static str,
}

impl ListenerKind {
    pub fn of<L: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<L>(),
            type_name: std::any::type_name::<L>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ListenerKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ListenerKind {}

impl Hash for ListenerKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerKind").field(&self.type_name).finish()
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::actions::EventAction;
    use crate::events::types::{ExecutionEventType, GenericExecutionEvent};

    struct AuditListener;

    impl ExecutionListener<GenericExecutionEvent> for AuditListener {
        fn notify(&self, _event: &GenericExecutionEvent) -> Result<EventActions, ListenerError> {
            Ok(EventAction::Log.into())
        }
    }

    struct SkipListener {
        skip: bool,
    }

    impl ExecutionListener<GenericExecutionEvent> for SkipListener {
        fn notify(&self, _event: &GenericExecutionEvent) -> Result<EventActions, ListenerError> {
            if self.skip {
                Ok(EventAction::SkipNode.into())
            } else {
                Ok(EventActions::empty())
            }
        }
    }

    #[test]
    fn test_kind_is_per_type_not_per_instance() {
        let a = SkipListener { skip: true };
        let b = SkipListener { skip: false };

        let kind_a = ExecutionListener::<GenericExecutionEvent>::kind(&a);
        let kind_b = ExecutionListener::<GenericExecutionEvent>::kind(&b);
        let kind_audit = ExecutionListener::<GenericExecutionEvent>::kind(&AuditListener);

        assert_eq!(kind_a, kind_b);
        assert_ne!(kind_a, kind_audit);
        assert_eq!(kind_a, ListenerKind::of::<SkipListener>());
    }

    #[test]
    fn test_kind_survives_dynamic_dispatch() {
        let boxed: Box<dyn ExecutionListener<GenericExecutionEvent>> = Box::new(AuditListener);
        assert_eq!(boxed.kind(), ListenerKind::of::<AuditListener>());
        assert!(boxed.listener_name().ends_with("AuditListener"));
    }

    #[test]
    fn test_closures_are_listeners() {
        let listener = |_event: &GenericExecutionEvent| -> Result<EventActions, ListenerError> {
            Ok(EventActions::of(EventAction::CancelProcess))
        };
        let event = GenericExecutionEvent::of_type(ExecutionEventType::NodeTokenCreated);

        let actions = listener.notify(&event).unwrap();
        assert!(actions.is_action_set(EventAction::CancelProcess));
    }
}

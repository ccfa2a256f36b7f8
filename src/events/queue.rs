//! # Execution Event Queue
//!
//! Registry and dispatcher between the workflow engine and its observers.
//!
//! ## Overview
//!
//! Listeners register for one or more event types. When the engine fires an event, every
//! registration for that event's type is notified in registration order and the
//! [`EventActions`] they return are merged into a single instruction for the engine.
//!
//! ## Key Features
//!
//! - **Typed registration**: one entry per (listener, event type); duplicates allowed
//! - **Kind-based removal**: unregisters every listener of the same concrete type
//! - **Fail-fast dispatch**: the first listener error aborts the dispatch and is returned
//!   unchanged
//! - **Pluggable concurrency**: lock-based or copy-on-write storage chosen at construction
//!
//! ## Usage
//!
//! ```rust
//! use execution_events::events::{
//!     EventAction, EventActions, ExecutionEventQueue, ExecutionEventType,
//!     GenericExecutionEvent, ListenerError,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), ListenerError> {
//! let queue = ExecutionEventQueue::<GenericExecutionEvent>::new_copy_on_write();
//!
//! let skip_nodes = |_event: &GenericExecutionEvent| -> Result<EventActions, ListenerError> {
//!     Ok(EventAction::SkipNode.into())
//! };
//! queue.add_listener(Arc::new(skip_nodes), [ExecutionEventType::NodeTokenCreated]);
//!
//! let event = GenericExecutionEvent::of_type(ExecutionEventType::NodeTokenCreated);
//! let actions = queue.fire_event(&event)?;
//! assert!(actions.is_action_set(EventAction::SkipNode));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::fmt;
use std::sync::Arc;
use tracing::trace;

use super::actions::EventActions;
use super::listener::{ExecutionListener, ListenerKind};
use super::registered::RegisteredListener;
use super::store::{ListenerStore, StorePolicy};
use super::types::ExecutionEvent;
use crate::config::EventQueueConfig;
use crate::error::ListenerError;
use crate::logging::log_registry_operation;

/// Registry and synchronous dispatcher for execution listeners
///
/// The queue is `Send + Sync`; share it behind an `Arc` to register and fire from
/// several threads.
pub struct ExecutionEventQueue<E: ExecutionEvent> {
    store: Box<dyn ListenerStore<E>>,
}

impl<E: ExecutionEvent> ExecutionEventQueue<E> {
    /// Queue backed by a mutex-guarded list
    pub fn new_locked() -> Self {
        Self::with_policy(StorePolicy::Locked)
    }

    /// Queue backed by copy-on-write snapshots
    pub fn new_copy_on_write() -> Self {
        Self::with_policy(StorePolicy::CopyOnWrite)
    }

    pub fn with_policy(policy: StorePolicy) -> Self {
        Self {
            store: policy.build_store(),
        }
    }

    pub fn from_config(config: &EventQueueConfig) -> Self {
        Self::with_policy(config.store_policy)
    }

    pub fn policy(&self) -> StorePolicy {
        self.store.policy()
    }

    /// Register `listener` for each of `event_types`
    ///
    /// Event types may be given as plain values or as `Option`s; `None` entries are
    /// skipped and an empty list registers nothing. Registering the same listener twice
    /// for a type means it is notified twice.
    pub fn add_listener<I>(&self, listener: Arc<dyn ExecutionListener<E>>, event_types: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<E::EventType>>,
    {
        let entries: Vec<_> = event_types
            .into_iter()
            .filter_map(Into::into)
            .map(|event_type| RegisteredListener::new(event_type, Arc::clone(&listener)))
            .collect();

        if entries.is_empty() {
            return;
        }

        let added = entries.len();
        self.store.append(entries);
        log_registry_operation("add_listener", listener.listener_name(), added, self.policy());
    }

    /// Unregister listeners of the same kind as `listener`
    ///
    /// With an empty `event_types` list every registration of that kind is removed.
    /// Otherwise only registrations whose event type is listed are removed; `None`
    /// entries match nothing.
    ///
    /// Matching is by [`ListenerKind`], not by instance: if two separately created
    /// listeners of the same type are registered, removing either one removes both.
    /// Give a listener type its own [`ExecutionListener::kind`] when instances must be
    /// managed independently.
    ///
    /// Returns the number of registrations removed.
    pub fn remove_listener<I>(&self, listener: &dyn ExecutionListener<E>, event_types: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<Option<E::EventType>>,
    {
        self.remove_listeners_of_kind(listener.kind(), event_types)
    }

    /// Unregister listeners by kind; see [`remove_listener`](Self::remove_listener)
    pub fn remove_listeners_of_kind<I>(&self, kind: ListenerKind, event_types: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<Option<E::EventType>>,
    {
        let filter: TypeFilter<E::EventType> = TypeFilter::from_items(event_types);
        let removed = self
            .store
            .remove_where(&|entry| entry.kind() == kind && filter.matches(entry.event_type()));

        if removed > 0 {
            log_registry_operation("remove_listener", kind.type_name(), removed, self.policy());
        }
        removed
    }

    /// Notify every listener registered for the event's type and merge their actions
    ///
    /// Listeners run on the calling thread in registration order. If one fails, its
    /// error is returned as is and the listeners after it are not notified.
    ///
    /// A listener may use the queue from inside `notify`, including firing a follow-on
    /// event. Registrations it adds or removes apply to later dispatches, not to the one
    /// already running.
    pub fn fire_event(&self, event: &E) -> Result<EventActions, ListenerError> {
        let event_type = event.event_type();
        let mut actions = EventActions::empty();
        let mut notified = 0usize;

        self.store.visit(&mut |entry| {
            if entry.handles(&event_type) {
                actions.merge_in_place(entry.notify(event)?);
                notified += 1;
            }
            Ok(())
        })?;

        trace!(event_type = ?event_type, notified, "Dispatched execution event");
        Ok(actions)
    }

    /// Number of registrations across all event types
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of registrations that would be notified for `event_type`
    pub fn registrations_for(&self, event_type: &E::EventType) -> usize {
        let mut count = 0;
        // The visitor never fails
        let _ = self.store.visit(&mut |entry| {
            if entry.handles(event_type) {
                count += 1;
            }
            Ok(())
        });
        count
    }

    pub fn stats(&self) -> EventQueueStats<E::EventType> {
        let mut by_event_type: Vec<(E::EventType, usize)> = Vec::new();
        let mut kinds: Vec<ListenerKind> = Vec::new();

        let _ = self.store.visit(&mut |entry| {
            match by_event_type
                .iter_mut()
                .find(|(event_type, _)| event_type == entry.event_type())
            {
                Some((_, count)) => *count += 1,
                None => by_event_type.push((entry.event_type().clone(), 1)),
            }
            if !kinds.contains(&entry.kind()) {
                kinds.push(entry.kind());
            }
            Ok(())
        });

        EventQueueStats {
            policy: self.policy(),
            total_registrations: by_event_type.iter().map(|(_, count)| count).sum(),
            distinct_listener_kinds: kinds.len(),
            by_event_type,
        }
    }

    /// Drop every registration; returns how many were removed
    pub fn clear(&self) -> usize {
        let removed = self.store.clear();
        log_registry_operation("clear", "*", removed, self.policy());
        removed
    }
}

impl<E: ExecutionEvent> Default for ExecutionEventQueue<E> {
    fn default() -> Self {
        Self::new_locked()
    }
}

impl<E: ExecutionEvent> fmt::Debug for ExecutionEventQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionEventQueue")
            .field("policy", &self.policy())
            .field("registrations", &self.len())
            .finish()
    }
}

/// Statistics about a queue's registrations
#[derive(Debug, Clone, PartialEq)]
pub struct EventQueueStats<T> {
    pub policy: StorePolicy,
    pub total_registrations: usize,
    pub distinct_listener_kinds: usize,
    /// Registration count per event type, in order of first registration
    pub by_event_type: Vec<(T, usize)>,
}

/// Event type selection for removal
enum TypeFilter<T> {
    /// No types were supplied
    All,
    /// Only these types; may be empty when every supplied item was `None`
    Only(Vec<T>),
}

impl<T: PartialEq> TypeFilter<T> {
    fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<T>>,
    {
        let mut supplied = false;
        let mut types = Vec::new();
        for item in items {
            supplied = true;
            if let Some(event_type) = item.into() {
                types.push(event_type);
            }
        }

        if supplied {
            Self::Only(types)
        } else {
            Self::All
        }
    }

    fn matches(&self, event_type: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.contains(event_type),
        }
    }
}

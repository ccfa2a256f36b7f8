#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Execution Events
//!
//! In-process event notification for workflow execution engines.
//!
//! ## Overview
//!
//! The engine fires lifecycle events (process started, node token created, arc token
//! merged, ...) through an [`ExecutionEventQueue`]. Observers register as listeners for
//! the event types they care about and answer each event with [`EventActions`], which
//! the queue merges into one instruction telling the engine whether to proceed, delay,
//! skip or cancel. The engine never depends on the observers themselves.
//!
//! ## Module Organization
//!
//! - [`events`] - Event model, listeners, stores and the queue
//! - [`config`] - Store policy configuration
//! - [`error`] - Listener and crate errors
//! - [`logging`] - Structured logging bootstrap
//!
//! ## Choosing a Store Policy
//!
//! | Policy                      | Dispatch                 | Register / remove      |
//! |-----------------------------|--------------------------|------------------------|
//! | [`StorePolicy::Locked`]     | serialized, blocks writes | cheap, blocks dispatch |
//! | [`StorePolicy::CopyOnWrite`] | lock-free snapshot       | O(n) copy              |
//!
//! Both policies notify exactly the same listeners.
//!
//! ## Quick Start
//!
//! ```rust
//! use execution_events::{
//!     EventAction, EventActions, ExecutionEventQueue, ExecutionEventType, ExecutionListener,
//!     GenericExecutionEvent, ListenerError,
//! };
//! use std::sync::Arc;
//!
//! struct HoldCompletion;
//!
//! impl ExecutionListener<GenericExecutionEvent> for HoldCompletion {
//!     fn notify(&self, _event: &GenericExecutionEvent) -> Result<EventActions, ListenerError> {
//!         Ok(EventAction::DelayNodeTokenCompletion.into())
//!     }
//! }
//!
//! let queue = ExecutionEventQueue::<GenericExecutionEvent>::new_locked();
//! queue.add_listener(Arc::new(HoldCompletion), [ExecutionEventType::NodeTokenCompleted]);
//!
//! let event = GenericExecutionEvent::of_type(ExecutionEventType::NodeTokenCompleted);
//! let actions = queue.fire_event(&event).unwrap();
//! assert!(actions.is_action_set(EventAction::DelayNodeTokenCompletion));
//!
//! queue.remove_listener(&HoldCompletion, Vec::<ExecutionEventType>::new());
//! assert!(queue.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::EventQueueConfig;
pub use error::{EventQueueError, ListenerError, Result};
pub use events::{
    EventAction, EventActions, EventQueueStats, ExecutionEvent, ExecutionEventQueue,
    ExecutionEventType, ExecutionListener, GenericExecutionEvent, ListenerKind, StorePolicy,
};
pub use logging::init_structured_logging;

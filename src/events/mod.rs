//! # Execution Events
//!
//! Listener registration and synchronous dispatch of workflow lifecycle events.
//!
//! ```text
//! ExecutionEventQueue
//! ├── ListenerStore        (locked or copy-on-write storage)
//! │   └── RegisteredListener (listener + one event type)
//! └── EventActions         (merged listener responses)
//! ```

pub mod actions;
pub mod listener;
pub mod queue;
pub mod registered;
pub mod store;
pub mod types;

// Re-export key types for convenience
pub use crate::error::ListenerError;
pub use actions::{EventAction, EventActions};
pub use listener::{ExecutionListener, ListenerKind};
pub use queue::{EventQueueStats, ExecutionEventQueue};
pub use registered::RegisteredListener;
pub use store::{CopyOnWriteListenerStore, ListenerStore, LockedListenerStore, StorePolicy};
pub use types::{ExecutionEvent, ExecutionEventType, GenericExecutionEvent};

//! # Listener Stores
//!
//! Storage for registered listeners, in registration order. Two strategies share the
//! [`ListenerStore`] contract and differ only in how they trade blocking for copying:
//!
//! - [`LockedListenerStore`] keeps the list behind a `parking_lot::ReentrantMutex`.
//!   Mutation and dispatch from different threads are fully serialized, so a dispatch
//!   blocks registration and dispatches on other threads. Best when listeners change
//!   often and events are rare.
//! - [`CopyOnWriteListenerStore`] publishes an immutable `Arc<Vec<_>>` through
//!   `ArcSwap`. Writers copy, modify and swap; readers iterate the snapshot they
//!   loaded and never block. Best when events are frequent and registration is rare.
//!
//! Both deliver exactly the same notifications. Under both, a listener may call back
//! into its own queue from `notify` (fire a follow-on event, register, remove, query);
//! the dispatch already in progress keeps walking the entries it started with.

use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use super::registered::RegisteredListener;
use super::types::ExecutionEvent;
use crate::error::ListenerError;

/// Visitor invoked once per stored entry, in registration order
pub type EntryVisitor<'a, E> = dyn FnMut(&RegisteredListener<E>) -> Result<(), ListenerError> + 'a;

/// Contract shared by both store strategies
pub trait ListenerStore<E: ExecutionEvent>: Send + Sync {
    /// Strategy implemented by this store
    fn policy(&self) -> StorePolicy;

    /// Append entries as one atomic mutation
    fn append(&self, entries: Vec<RegisteredListener<E>>);

    /// Remove every entry matching `predicate` as one atomic mutation; returns how many
    /// entries were removed
    fn remove_where(&self, predicate: &dyn Fn(&RegisteredListener<E>) -> bool) -> usize;

    /// Walk a consistent view of the entries, stopping at the first visitor error
    fn visit(&self, visitor: &mut EntryVisitor<'_, E>) -> Result<(), ListenerError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry as one atomic mutation; returns how many were removed
    fn clear(&self) -> usize;
}

/// Concurrency strategy for a listener store
///
/// Deserialization goes through [`FromStr`](std::str::FromStr), so configuration files,
/// environment variables and [`EventQueueConfig::from_env`](crate::EventQueueConfig::from_env)
/// accept the same spellings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum StorePolicy {
    /// Mutex-guarded list; cheap mutation, serialized dispatch
    #[default]
    Locked,
    /// Atomically swapped snapshots; non-blocking dispatch, O(n) mutation
    CopyOnWrite,
}

impl StorePolicy {
    /// Build an empty store implementing this policy
    pub fn build_store<E: ExecutionEvent>(self) -> Box<dyn ListenerStore<E>> {
        match self {
            Self::Locked => Box::new(LockedListenerStore::new()),
            Self::CopyOnWrite => Box::new(CopyOnWriteListenerStore::new()),
        }
    }
}

impl fmt::Display for StorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::CopyOnWrite => write!(f, "copy_on_write"),
        }
    }
}

impl std::str::FromStr for StorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" | "lock" | "mutex" => Ok(Self::Locked),
            "copy_on_write" | "copy-on-write" | "cow" => Ok(Self::CopyOnWrite),
            _ => Err(format!("Invalid store policy: {s}")),
        }
    }
}

impl TryFrom<String> for StorePolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Listener store guarded by a single re-entrant mutex
///
/// The lock is held for the whole of a dispatch, so other threads wait until it ends.
/// The dispatching thread itself may re-enter: a listener can fire a follow-on event,
/// query the queue, or register and remove listeners. The list lives behind an `Arc`;
/// a dispatch walks the list it found when it started, and a mutation made while that
/// walk is in progress copies the list instead of editing it in place.
pub struct LockedListenerStore<E: ExecutionEvent> {
    entries: ReentrantMutex<RefCell<Arc<Vec<RegisteredListener<E>>>>>,
}

impl<E: ExecutionEvent> LockedListenerStore<E> {
    pub fn new() -> Self {
        Self {
            entries: ReentrantMutex::new(RefCell::new(Arc::new(Vec::new()))),
        }
    }
}

impl<E: ExecutionEvent> Default for LockedListenerStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

// RefCell borrows below never outlive the method that takes them and never span a
// listener call, so re-entry from a listener cannot hit an outstanding borrow.
impl<E: ExecutionEvent> ListenerStore<E> for LockedListenerStore<E> {
    fn policy(&self) -> StorePolicy {
        StorePolicy::Locked
    }

    fn append(&self, entries: Vec<RegisteredListener<E>>) {
        if entries.is_empty() {
            return;
        }

        let guard = self.entries.lock();
        let mut current = guard.borrow_mut();
        Arc::make_mut(&mut *current).extend(entries);
    }

    fn remove_where(&self, predicate: &dyn Fn(&RegisteredListener<E>) -> bool) -> usize {
        let guard = self.entries.lock();
        let mut current = guard.borrow_mut();
        if !current.iter().any(|entry| predicate(entry)) {
            return 0;
        }

        let before = current.len();
        let list = Arc::make_mut(&mut *current);
        list.retain(|entry| !predicate(entry));
        before - list.len()
    }

    fn visit(&self, visitor: &mut EntryVisitor<'_, E>) -> Result<(), ListenerError> {
        let guard = self.entries.lock();
        let walking = Arc::clone(&*guard.borrow());
        for entry in walking.iter() {
            visitor(entry)?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.lock().borrow().len()
    }

    fn clear(&self) -> usize {
        let guard = self.entries.lock();
        let previous = guard.replace(Arc::new(Vec::new()));
        previous.len()
    }
}

/// Listener store publishing immutable snapshots
///
/// Writers serialize on `write_lock` so no mutation is lost between loading the
/// current snapshot and swapping in the copy.
pub struct CopyOnWriteListenerStore<E: ExecutionEvent> {
    entries: ArcSwap<Vec<RegisteredListener<E>>>,
    write_lock: Mutex<()>,
}

impl<E: ExecutionEvent> CopyOnWriteListenerStore<E> {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Point-in-time view of the entries
    pub fn snapshot(&self) -> Arc<Vec<RegisteredListener<E>>> {
        self.entries.load_full()
    }
}

impl<E: ExecutionEvent> Default for CopyOnWriteListenerStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExecutionEvent> ListenerStore<E> for CopyOnWriteListenerStore<E> {
    fn policy(&self) -> StorePolicy {
        StorePolicy::CopyOnWrite
    }

    fn append(&self, entries: Vec<RegisteredListener<E>>) {
        if entries.is_empty() {
            return;
        }

        let _guard = self.write_lock.lock();
        let current = self.entries.load();
        let mut next = Vec::with_capacity(current.len() + entries.len());
        next.extend(current.iter().cloned());
        next.extend(entries);
        self.entries.store(Arc::new(next));
    }

    fn remove_where(&self, predicate: &dyn Fn(&RegisteredListener<E>) -> bool) -> usize {
        let _guard = self.write_lock.lock();
        let current = self.entries.load();
        let next: Vec<_> = current
            .iter()
            .filter(|entry| !predicate(entry))
            .cloned()
            .collect();

        let removed = current.len() - next.len();
        if removed > 0 {
            self.entries.store(Arc::new(next));
        }
        removed
    }

    fn visit(&self, visitor: &mut EntryVisitor<'_, E>) -> Result<(), ListenerError> {
        let snapshot = self.entries.load_full();
        for entry in snapshot.iter() {
            visitor(entry)?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.load().len()
    }

    fn clear(&self) -> usize {
        let _guard = self.write_lock.lock();
        self.entries.swap(Arc::new(Vec::new())).len()
    }
}

//! # Event Actions
//!
//! The instruction set a listener hands back to the engine after handling an event.
//! Results from every listener notified by a single dispatch are merged into one
//! [`EventActions`] value. Merging is set union, so it is associative and
//! commutative, and [`EventActions::empty`] is its identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single instruction from a listener to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Hold the node token open; the listener will complete it later
    DelayNodeTokenCompletion,
    /// Hold process completion until the listener finalizes it
    DelayProcessFinalizeCompletion,
    /// Hold process cancellation until the listener finalizes it
    DelayProcessFinalizeCancel,
    /// Cancel the running process
    CancelProcess,
    /// Skip the node the event was fired for
    SkipNode,
    /// Record the event in the engine's audit log
    Log,
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DelayNodeTokenCompletion => write!(f, "delay_node_token_completion"),
            Self::DelayProcessFinalizeCompletion => write!(f, "delay_process_finalize_completion"),
            Self::DelayProcessFinalizeCancel => write!(f, "delay_process_finalize_cancel"),
            Self::CancelProcess => write!(f, "cancel_process"),
            Self::SkipNode => write!(f, "skip_node"),
            Self::Log => write!(f, "log"),
        }
    }
}

/// Composite result of notifying one or more listeners
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventActions {
    actions: BTreeSet<EventAction>,
}

impl EventActions {
    /// The neutral value: merging it with any `x` yields `x`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Actions containing a single instruction
    pub fn of(action: EventAction) -> Self {
        Self::empty().with(action)
    }

    /// Builder-style variant of [`add`](Self::add)
    #[must_use]
    pub fn with(mut self, action: EventAction) -> Self {
        self.actions.insert(action);
        self
    }

    pub fn add(&mut self, action: EventAction) {
        self.actions.insert(action);
    }

    /// Combine two results into one
    #[must_use]
    pub fn merge(mut self, other: EventActions) -> Self {
        self.merge_in_place(other);
        self
    }

    /// Fold `other` into `self`
    pub fn merge_in_place(&mut self, other: EventActions) {
        if self.actions.is_empty() {
            self.actions = other.actions;
        } else {
            self.actions.extend(other.actions);
        }
    }

    pub fn is_action_set(&self, action: EventAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = EventAction> + '_ {
        self.actions.iter().copied()
    }
}

impl From<EventAction> for EventActions {
    fn from(action: EventAction) -> Self {
        Self::of(action)
    }
}

impl FromIterator<EventAction> for EventActions {
    fn from_iter<I: IntoIterator<Item = EventAction>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl Extend<EventAction> for EventActions {
    fn extend<I: IntoIterator<Item = EventAction>>(&mut self, iter: I) {
        self.actions.extend(iter);
    }
}

impl IntoIterator for EventActions {
    type Item = EventAction;
    type IntoIter = std::collections::btree_set::IntoIter<EventAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

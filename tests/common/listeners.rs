//! Host-side event model and listeners shared by the integration tests.

use execution_events::{
    EventAction, EventActions, ExecutionEvent, ExecutionEventQueue, ExecutionListener,
    ListenerError, StorePolicy,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Event taxonomy owned by the test "engine", independent of the crate's own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NodeStarted,
    NodeComplete,
    TokenCreated,
    TokenMerged,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::NodeStarted,
        Phase::NodeComplete,
        Phase::TokenCreated,
        Phase::TokenMerged,
    ];
}

/// Event that counts how many listeners saw it
#[derive(Debug)]
pub struct NodeEvent {
    pub phase: Phase,
    pub node: String,
    hits: AtomicUsize,
}

impl NodeEvent {
    pub fn new(phase: Phase, node: impl Into<String>) -> Self {
        Self {
            phase,
            node: node.into(),
            hits: AtomicUsize::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

impl ExecutionEvent for NodeEvent {
    type EventType = Phase;

    fn event_type(&self) -> Phase {
        self.phase
    }
}

pub type Queue = ExecutionEventQueue<NodeEvent>;

pub fn queue_with(policy: StorePolicy) -> Queue {
    Queue::with_policy(policy)
}

pub const POLICIES: [StorePolicy; 2] = [StorePolicy::Locked, StorePolicy::CopyOnWrite];

/// Shared record of which listeners ran, in order
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    pub fn record(&self, name: &'static str) {
        self.0.lock().push(name);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.lock().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.lock().iter().filter(|call| **call == name).count()
    }
}

/// Records its name and answers with a fixed action
pub struct ActionListener {
    pub name: &'static str,
    pub action: EventAction,
    pub log: CallLog,
}

impl ActionListener {
    pub fn new(name: &'static str, action: EventAction, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            action,
            log: log.clone(),
        })
    }
}

impl ExecutionListener<NodeEvent> for ActionListener {
    fn notify(&self, event: &NodeEvent) -> Result<EventActions, ListenerError> {
        event.hit();
        self.log.record(self.name);
        Ok(EventActions::of(self.action))
    }
}

/// Second listener type answering like `ActionListener`, matched separately on removal
pub struct AuditListener {
    pub log: CallLog,
}

impl ExecutionListener<NodeEvent> for AuditListener {
    fn notify(&self, event: &NodeEvent) -> Result<EventActions, ListenerError> {
        event.hit();
        self.log.record("audit");
        Ok(EventAction::Log.into())
    }
}

/// Counts the hit on the event and nothing else
pub struct HitListener;

impl ExecutionListener<NodeEvent> for HitListener {
    fn notify(&self, event: &NodeEvent) -> Result<EventActions, ListenerError> {
        event.hit();
        Ok(EventActions::empty())
    }
}

/// Always fails
pub struct BrokenListener {
    pub log: CallLog,
}

impl ExecutionListener<NodeEvent> for BrokenListener {
    fn notify(&self, event: &NodeEvent) -> Result<EventActions, ListenerError> {
        event.hit();
        self.log.record("broken");
        Err(ListenerError::failed(format!("cannot handle node {}", event.node)))
    }
}

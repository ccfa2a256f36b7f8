//! # Execution Event Model
//!
//! The queue only needs one thing from an event: its type. Hosts bring their own event
//! structs and taxonomy by implementing [`ExecutionEvent`]. For hosts that don't,
//! [`ExecutionEventType`] is a workflow lifecycle taxonomy and [`GenericExecutionEvent`]
//! a ready-made event carrying a JSON payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fmt::Debug;
use uuid::Uuid;

/// An event the workflow engine can fire through an execution event queue
pub trait ExecutionEvent: Send + Sync + 'static {
    /// Classification tag used to route the event to interested listeners
    type EventType: Clone + Eq + Debug + Send + Sync + 'static;

    /// The type of this event
    fn event_type(&self) -> Self::EventType;
}

/// Workflow lifecycle event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionEventType {
    ProcessCreated,
    ProcessStarted,
    ProcessPendingComplete,
    ProcessCompleted,
    ProcessPendingCancel,
    ProcessCanceled,
    NodeTokenCreated,
    NodeTokenAccepted,
    NodeTokenDiscarded,
    NodeTokenSkipped,
    NodeTokenCompleted,
    NodeTokenBacktracked,
    ArcTokenCreated,
    ArcTokenProcessed,
    ArcTokenCompleted,
    ArcTokenMerged,
    ArcTokenBacktracked,
}

impl ExecutionEventType {
    pub const ALL: [ExecutionEventType; 17] = [
        Self::ProcessCreated,
        Self::ProcessStarted,
        Self::ProcessPendingComplete,
        Self::ProcessCompleted,
        Self::ProcessPendingCancel,
        Self::ProcessCanceled,
        Self::NodeTokenCreated,
        Self::NodeTokenAccepted,
        Self::NodeTokenDiscarded,
        Self::NodeTokenSkipped,
        Self::NodeTokenCompleted,
        Self::NodeTokenBacktracked,
        Self::ArcTokenCreated,
        Self::ArcTokenProcessed,
        Self::ArcTokenCompleted,
        Self::ArcTokenMerged,
        Self::ArcTokenBacktracked,
    ];

    /// Check if this event concerns the process as a whole
    pub fn is_process_event(&self) -> bool {
        matches!(
            self,
            Self::ProcessCreated
                | Self::ProcessStarted
                | Self::ProcessPendingComplete
                | Self::ProcessCompleted
                | Self::ProcessPendingCancel
                | Self::ProcessCanceled
        )
    }

    /// Check if this event concerns a node token
    pub fn is_node_token_event(&self) -> bool {
        matches!(
            self,
            Self::NodeTokenCreated
                | Self::NodeTokenAccepted
                | Self::NodeTokenDiscarded
                | Self::NodeTokenSkipped
                | Self::NodeTokenCompleted
                | Self::NodeTokenBacktracked
        )
    }

    /// Check if this event concerns an arc token
    pub fn is_arc_token_event(&self) -> bool {
        matches!(
            self,
            Self::ArcTokenCreated
                | Self::ArcTokenProcessed
                | Self::ArcTokenCompleted
                | Self::ArcTokenMerged
                | Self::ArcTokenBacktracked
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessCreated => "process_created",
            Self::ProcessStarted => "process_started",
            Self::ProcessPendingComplete => "process_pending_complete",
            Self::ProcessCompleted => "process_completed",
            Self::ProcessPendingCancel => "process_pending_cancel",
            Self::ProcessCanceled => "process_canceled",
            Self::NodeTokenCreated => "node_token_created",
            Self::NodeTokenAccepted => "node_token_accepted",
            Self::NodeTokenDiscarded => "node_token_discarded",
            Self::NodeTokenSkipped => "node_token_skipped",
            Self::NodeTokenCompleted => "node_token_completed",
            Self::NodeTokenBacktracked => "node_token_backtracked",
            Self::ArcTokenCreated => "arc_token_created",
            Self::ArcTokenProcessed => "arc_token_processed",
            Self::ArcTokenCompleted => "arc_token_completed",
            Self::ArcTokenMerged => "arc_token_merged",
            Self::ArcTokenBacktracked => "arc_token_backtracked",
        }
    }
}

impl fmt::Display for ExecutionEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExecutionEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|event_type| event_type.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid execution event type: {s}"))
    }
}

/// Event value carrying a lifecycle type and an opaque JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericExecutionEvent {
    pub event_id: Uuid,
    pub event_type: ExecutionEventType,
    pub payload: Value,
    pub fired_at: DateTime<Utc>,
}

impl GenericExecutionEvent {
    pub fn new(event_type: ExecutionEventType, payload: Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            payload,
            fired_at: Utc::now(),
        }
    }

    /// Create an event with an empty payload
    pub fn of_type(event_type: ExecutionEventType) -> Self {
        Self::new(event_type, Value::Null)
    }
}

impl ExecutionEvent for GenericExecutionEvent {
    type EventType = ExecutionEventType;

    fn event_type(&self) -> ExecutionEventType {
        self.event_type
    }
}

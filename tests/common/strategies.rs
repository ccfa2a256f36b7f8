use execution_events::{EventAction, EventActions};
use proptest::prelude::*;

use super::listeners::Phase;

pub fn event_action_strategy() -> impl Strategy<Value = EventAction> {
    prop_oneof![
        Just(EventAction::DelayNodeTokenCompletion),
        Just(EventAction::DelayProcessFinalizeCompletion),
        Just(EventAction::DelayProcessFinalizeCancel),
        Just(EventAction::CancelProcess),
        Just(EventAction::SkipNode),
        Just(EventAction::Log),
    ]
}

/// Strategy for generating arbitrary action sets, including the empty one
pub fn event_actions_strategy() -> impl Strategy<Value = EventActions> {
    prop::collection::vec(event_action_strategy(), 0..6)
        .prop_map(|actions| actions.into_iter().collect())
}

pub fn phase_strategy() -> impl Strategy<Value = Phase> {
    prop::sample::select(Phase::ALL.to_vec())
}

/// A registration: which of three listener slots, for which phases (duplicates allowed)
pub fn registration_strategy() -> impl Strategy<Value = (usize, Vec<Phase>)> {
    (0usize..3, prop::collection::vec(phase_strategy(), 0..5))
}

pub fn registrations_strategy() -> impl Strategy<Value = Vec<(usize, Vec<Phase>)>> {
    prop::collection::vec(registration_strategy(), 0..12)
}

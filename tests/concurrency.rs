//! Dispatch racing registration and removal must always see a committed registry.
//!
//! One `HitListener` stays registered for the whole run. Writers add `PairListener`
//! entries two at a time in a single call and remove them by kind, so any consistent
//! view holds an odd number of matching entries. A torn view would show up as an even
//! hit count.

mod common;

use common::*;
use execution_events::{EventActions, ExecutionListener, ListenerError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FIRING_THREADS: usize = 4;
const MUTATING_THREADS: usize = 3;
const ROUNDS: usize = 300;

struct PairListener;

impl ExecutionListener<NodeEvent> for PairListener {
    fn notify(&self, event: &NodeEvent) -> Result<EventActions, ListenerError> {
        event.hit();
        Ok(EventActions::empty())
    }
}

fn run_mixed_load(queue: Arc<Queue>) {
    queue.add_listener(Arc::new(HitListener), [Phase::NodeStarted]);

    let writers_finished = AtomicUsize::new(0);

    crossbeam::thread::scope(|scope| {
        for _ in 0..MUTATING_THREADS {
            let queue = Arc::clone(&queue);
            let writers_finished = &writers_finished;
            scope.spawn(move |_| {
                for round in 0..ROUNDS {
                    queue.add_listener(
                        Arc::new(PairListener),
                        [Phase::NodeStarted, Phase::NodeStarted],
                    );
                    if round % 3 == 0 {
                        queue.remove_listener(&PairListener, [Phase::NodeStarted]);
                    }
                }
                writers_finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        for _ in 0..FIRING_THREADS {
            let queue = Arc::clone(&queue);
            let writers_finished = &writers_finished;
            scope.spawn(move |_| loop {
                let settled = writers_finished.load(Ordering::SeqCst) == MUTATING_THREADS;

                let event = NodeEvent::new(Phase::NodeStarted, "race");
                queue.fire_event(&event).unwrap();
                assert_eq!(event.hits() % 2, 1, "torn registry: {} hits", event.hits());

                if settled {
                    break;
                }
            });
        }
    })
    .unwrap();

    // Only the HitListener and whole pairs can remain
    assert_eq!(queue.len() % 2, 1);
    let event = NodeEvent::new(Phase::NodeStarted, "after");
    queue.fire_event(&event).unwrap();
    assert_eq!(event.hits(), queue.len());
}

#[test]
fn test_locked_store_under_mixed_load() {
    run_mixed_load(Arc::new(Queue::new_locked()));
}

#[test]
fn test_copy_on_write_store_under_mixed_load() {
    run_mixed_load(Arc::new(Queue::new_copy_on_write()));
}

#[test]
fn test_concurrent_registration_loses_nothing() {
    for policy in POLICIES {
        let queue = Arc::new(queue_with(policy));

        crossbeam::thread::scope(|scope| {
            for _ in 0..8 {
                let queue = Arc::clone(&queue);
                scope.spawn(move |_| {
                    for _ in 0..100 {
                        queue.add_listener(Arc::new(HitListener), [Phase::TokenCreated]);
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(queue.registrations_for(&Phase::TokenCreated), 800, "{policy}");
    }
}

use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory translation counters for the current thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub classes: BTreeMap<String, ClassCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Compiler entrypoints
    pub inserts: u64,
    pub updates: u64,

    // Output size
    pub insert_fields: u64,
    pub update_paths: u64,
    pub noop_updates: u64,

    // Forward references
    pub references_deferred: u64,

    // Failures
    pub failures: u64,
    pub conflicts: u64,
}

///
/// ClassCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ClassCounters {
    pub inserts: u64,
    pub updates: u64,
    pub deferred_updates: u64,
    pub references_deferred: u64,
    pub failures: u64,
}

///
/// EventReport
/// Snapshot handed to callers; serializes for diagnostics endpoints.
///

pub type EventReport = EventState;

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(EventState::clone)
}

//! Translation sink boundary.
//!
//! All instrumentation flows through TranslateEvent and TranslateSink.
//! This module is the only bridge between the persister and the
//! thread-local counter state.
use crate::{error::ErrorClass, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn TranslateSink>> = RefCell::new(None);
}

///
/// TranslateEvent
///

#[derive(Clone, Copy, Debug)]
pub enum TranslateEvent<'a> {
    InsertCompiled {
        class: &'a str,
        fields: u64,
        deferred: u64,
    },
    UpdateCompiled {
        class: &'a str,
        paths: u64,
    },
    ReferenceDeferred {
        class: &'a str,
        field: &'a str,
    },
    TranslateFailed {
        class: &'a str,
        error_class: ErrorClass,
    },
}

///
/// TranslateSink
///

pub trait TranslateSink {
    fn record(&self, event: TranslateEvent<'_>);
}

/// GlobalTranslateSink
/// Default sink that writes into the thread-local counter state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalTranslateSink;

impl TranslateSink for GlobalTranslateSink {
    fn record(&self, event: TranslateEvent<'_>) {
        match event {
            TranslateEvent::InsertCompiled {
                class,
                fields,
                deferred,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.inserts = m.ops.inserts.saturating_add(1);
                    m.ops.insert_fields = m.ops.insert_fields.saturating_add(fields);
                    let entry = m.classes.entry(class.to_string()).or_default();
                    entry.inserts = entry.inserts.saturating_add(1);
                    entry.deferred_updates = entry.deferred_updates.saturating_add(deferred);
                });
            }

            TranslateEvent::UpdateCompiled { class, paths } => {
                metrics::with_state_mut(|m| {
                    m.ops.updates = m.ops.updates.saturating_add(1);
                    m.ops.update_paths = m.ops.update_paths.saturating_add(paths);
                    if paths == 0 {
                        m.ops.noop_updates = m.ops.noop_updates.saturating_add(1);
                    }
                    let entry = m.classes.entry(class.to_string()).or_default();
                    entry.updates = entry.updates.saturating_add(1);
                });
            }

            TranslateEvent::ReferenceDeferred { class, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.references_deferred = m.ops.references_deferred.saturating_add(1);
                    let entry = m.classes.entry(class.to_string()).or_default();
                    entry.references_deferred = entry.references_deferred.saturating_add(1);
                });
            }

            TranslateEvent::TranslateFailed { class, error_class } => {
                metrics::with_state_mut(|m| {
                    m.ops.failures = m.ops.failures.saturating_add(1);
                    if error_class == ErrorClass::Conflict {
                        m.ops.conflicts = m.ops.conflicts.saturating_add(1);
                    }
                    let entry = m.classes.entry(class.to_string()).or_default();
                    entry.failures = entry.failures.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_TRANSLATE_SINK: GlobalTranslateSink = GlobalTranslateSink;

pub(crate) fn record(event: TranslateEvent<'_>) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // Preconditions:
        // - `ptr` was produced from a valid `&dyn TranslateSink` in `with_translate_sink`.
        // - `with_translate_sink` always restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        //
        // Aliasing:
        // - Only a shared reference is materialized, matching the shared borrow
        //   used to install the override.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_TRANSLATE_SINK.record(event);
    }
}

/// Snapshot the current thread's translation counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all translation counters on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary sink override on the current thread.
///
/// Events recorded inside `f` go to `sink` instead of the global counters.
/// Overrides nest; the previous sink is restored on return and on unwind.
pub fn with_translate_sink<T>(sink: &dyn TranslateSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn TranslateSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // Preconditions:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` always restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    //
    // What would break this:
    // - Any deferred use of `sink_ptr` beyond this scope.
    // - Any path that bypasses Guard restoration.
    let sink_ptr =
        unsafe { std::mem::transmute::<&dyn TranslateSink, *const dyn TranslateSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

//! Observability: translation counters and sink abstractions.
//!
//! Persister code records [`TranslateEvent`]s through the sink boundary and
//! never touches the counter state directly.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{ClassCounters, EventOps, EventReport};
pub use sink::{TranslateEvent, TranslateSink, metrics_report, metrics_reset_all, with_translate_sink};

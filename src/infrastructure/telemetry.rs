//! Tracing setup and the noise filter.
//!
//! The filter suppresses one known-benign warning class the MCP client
//! library emits while negotiating notification schemas during tool
//! enumeration. It is owned by whoever creates it; the orchestrator
//! disables it once the noisy negotiation window has closed so the same
//! message is visible again if it ever shows up later.

use std::fmt;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt};

use crate::constants::SCHEMA_NOISE_MARKER;

/// Togglable predicate over log records. Cloning shares the toggle.
#[derive(Clone, Debug)]
pub struct NoiseFilter {
    enabled: Arc<AtomicBool>,
}

impl NoiseFilter {
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// While enabled, drops exactly the records whose message contains
    /// the suppressed substring; passes everything otherwise.
    pub fn allows(&self, message: &str) -> bool {
        !self.enabled.load(Ordering::Relaxed) || !message.contains(SCHEMA_NOISE_MARKER)
    }

    /// Pass every record from now on. Safe to call more than once.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new()
    }
}

struct NoiseFilterLayer {
    filter: NoiseFilter,
}

impl<S: Subscriber> Layer<S> for NoiseFilterLayer {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.filter.allows(&visitor.message)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Initialize the process-wide subscriber with the given noise filter
/// attached. `RUST_LOG` wins over the verbosity flag when set.
pub fn init(verbose: bool, filter: NoiseFilter) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let default_level = if verbose { "debug" } else { "info" };
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::registry()
            .with(env_filter)
            .with(NoiseFilterLayer {
                filter,
            })
            .with(tracing_fmt::layer().with_target(false))
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_messages_containing_the_marker() {
        let filter = NoiseFilter::new();
        assert!(!filter.allows("Failed to validate notification: unknown field"));
        assert!(!filter.allows(SCHEMA_NOISE_MARKER));
    }

    #[test]
    fn passes_unrelated_messages() {
        let filter = NoiseFilter::new();
        assert!(filter.allows("Listed tools for server"));
    }

    #[test]
    fn partial_marker_is_not_suppressed() {
        let filter = NoiseFilter::new();
        let half = &SCHEMA_NOISE_MARKER[..SCHEMA_NOISE_MARKER.len() / 2];
        assert!(filter.allows(half));
    }

    #[test]
    fn disabling_passes_everything_and_is_idempotent() {
        let filter = NoiseFilter::new();
        filter.disable();
        assert!(filter.allows("Failed to validate notification: unknown field"));

        filter.disable();
        assert!(!filter.is_enabled());
        assert!(filter.allows(SCHEMA_NOISE_MARKER));
    }

    #[test]
    fn clones_share_the_toggle() {
        let filter = NoiseFilter::new();
        let handle = filter.clone();
        handle.disable();
        assert!(filter.allows(SCHEMA_NOISE_MARKER));
    }
}

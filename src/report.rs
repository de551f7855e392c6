//! Progress reporting channel.
//!
//! Merge stages describe what they do as human-readable lines sent to a
//! [`Reporter`]. The messages carry no semantics; only the merge results do.
//! Pick [`TracingReporter`] to route them into the application's `tracing`
//! subscriber, [`CollectingReporter`] to inspect them in tests, or
//! [`NullReporter`] to drop them.

/// A sink for progress messages.
pub trait Reporter {
    /// Accept one progress line.
    fn report(&mut self, message: &str);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, message: &str) {
        (**self).report(message);
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, message: &str) {
        (**self).report(message);
    }
}

/// Forwards every message to `tracing::info!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, message: &str) {
        tracing::info!(target: "asm_merge", "{message}");
    }
}

/// Keeps every message in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectingReporter {
    pub messages: Vec<String>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _message: &str) {}
}

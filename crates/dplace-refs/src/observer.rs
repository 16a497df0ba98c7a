//! Observers for citation resolution events.
//!
//! Resolution itself is pure; anything that wants to watch it (logging,
//! key frequency statistics for maintainers) is passed in explicitly as a
//! [`ResolutionObserver`].

use std::collections::HashMap;

use crate::resolve::ResolvedSource;
use crate::split::CitationMention;

/// Receives resolution events.
///
/// All methods have empty default implementations, so observers only
/// implement the events they care about.
pub trait ResolutionObserver {
    /// A mention was split out of a field cited by `record`.
    fn on_mention(&mut self, _mention: &CitationMention, _record: &str) {}

    /// A key was rewritten by the correction table.
    fn on_corrected(&mut self, _from: &str, _to: &str, _record: &str) {}

    /// A key was rewritten by a contextual override for `record`.
    fn on_overridden(&mut self, _from: &str, _to: &str, _record: &str) {}

    /// An excluded key was dropped.
    fn on_dropped(&mut self, _key: &str, _record: &str) {}

    /// A mention resolved to a source.
    fn on_resolved(&mut self, _source: &ResolvedSource, _record: &str) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn on_corrected(&mut self, from: &str, to: &str, record: &str) {
        tracing::debug!(from, to, record, "Corrected citation key");
    }

    fn on_overridden(&mut self, from: &str, to: &str, record: &str) {
        tracing::debug!(from, to, record, "Applied contextual override");
    }

    fn on_dropped(&mut self, key: &str, record: &str) {
        tracing::debug!(key, record, "Dropped excluded citation");
    }
}

/// Counts how often each raw mention key occurs.
#[derive(Debug, Clone, Default)]
pub struct KeyFrequency {
    counts: HashMap<String, usize>,
}

impl KeyFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of mentions seen.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct keys seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// The `n` most frequent keys, ties broken alphabetically.
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<_> = self
            .counts
            .iter()
            .map(|(key, count)| (key.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

impl ResolutionObserver for KeyFrequency {
    fn on_mention(&mut self, mention: &CitationMention, _record: &str) {
        *self.counts.entry(mention.key.clone()).or_default() += 1;
    }
}

impl<T: ResolutionObserver + ?Sized> ResolutionObserver for &mut T {
    fn on_mention(&mut self, mention: &CitationMention, record: &str) {
        (**self).on_mention(mention, record);
    }

    fn on_corrected(&mut self, from: &str, to: &str, record: &str) {
        (**self).on_corrected(from, to, record);
    }

    fn on_overridden(&mut self, from: &str, to: &str, record: &str) {
        (**self).on_overridden(from, to, record);
    }

    fn on_dropped(&mut self, key: &str, record: &str) {
        (**self).on_dropped(key, record);
    }

    fn on_resolved(&mut self, source: &ResolvedSource, record: &str) {
        (**self).on_resolved(source, record);
    }
}

/// Forward every event to both observers, first `A` then `B`.
impl<A: ResolutionObserver, B: ResolutionObserver> ResolutionObserver for (A, B) {
    fn on_mention(&mut self, mention: &CitationMention, record: &str) {
        self.0.on_mention(mention, record);
        self.1.on_mention(mention, record);
    }

    fn on_corrected(&mut self, from: &str, to: &str, record: &str) {
        self.0.on_corrected(from, to, record);
        self.1.on_corrected(from, to, record);
    }

    fn on_overridden(&mut self, from: &str, to: &str, record: &str) {
        self.0.on_overridden(from, to, record);
        self.1.on_overridden(from, to, record);
    }

    fn on_dropped(&mut self, key: &str, record: &str) {
        self.0.on_dropped(key, record);
        self.1.on_dropped(key, record);
    }

    fn on_resolved(&mut self, source: &ResolvedSource, record: &str) {
        self.0.on_resolved(source, record);
        self.1.on_resolved(source, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(observer: &mut impl ResolutionObserver, keys: &[&str]) {
        for key in keys {
            observer.on_mention(&CitationMention::new(*key, None), "S1");
        }
    }

    #[test]
    fn test_most_common_orders_by_count_then_key() {
        let mut freq = KeyFrequency::new();
        feed(&mut freq, &["b", "a", "c", "a", "b", "d"]);

        assert_eq!(freq.most_common(3), vec![("a", 2), ("b", 2), ("c", 1)]);
        assert_eq!(freq.total(), 6);
        assert_eq!(freq.distinct(), 4);
        assert_eq!(freq.count("zzz"), 0);
    }

    #[test]
    fn test_pair_forwards_to_both() {
        let mut pair = (KeyFrequency::new(), KeyFrequency::new());
        feed(&mut pair, &["a", "a"]);
        assert_eq!(pair.0.count("a"), 2);
        assert_eq!(pair.1.count("a"), 2);
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut freq = KeyFrequency::new();
        {
            let mut borrowed = (&mut freq, NoopObserver);
            feed(&mut borrowed, &["x"]);
        }
        assert_eq!(freq.count("x"), 1);
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_corrections_logged_at_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingObserver.on_corrected("Bodwich 1873", "Bowdich 1873", "S1");
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("DEBUG"), "Got: {}", output);
        assert!(output.contains("Corrected citation key"), "Got: {}", output);
    }
}

//! Suggestion debounce module
//!
//! A single-slot timer for search-as-you-type frontends. Every keystroke
//! replaces the pending suggestion query outright, and only a fragment that
//! survives the quiet period untouched is released. Scheduling cancels the
//! previous pending query rather than extending its deadline, so at most
//! one suggestion request is ever due: the most recent one.
//!
//! Time is passed in by the caller, which keeps the type deterministic and
//! lets frontends drive it from whatever loop they already run.

use std::time::{Duration, Instant};

/// Quiet period a fragment must survive before its suggestion query fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Single-slot holder for the latest pending suggestion query.
///
/// This is the building block for keystroke-driven frontends. The terminal
/// binary shipped with this crate reads whole lines and asks for
/// suggestions once per submitted fragment, so it does not drive a
/// debouncer.
#[derive(Debug)]
pub struct SuggestionDebouncer {
    quiet_period: Duration,
    pending: Option<PendingQuery>,
}

#[derive(Debug)]
struct PendingQuery {
    fragment: String,
    due_at: Instant,
}

impl SuggestionDebouncer {
    /// Creates a debouncer with the default quiet period.
    pub fn new() -> Self {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    /// Creates a debouncer with a custom quiet period.
    pub fn with_quiet_period(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Records the current content of the search input.
    ///
    /// A non-empty fragment replaces any pending query and re-arms the full
    /// quiet period. An empty or whitespace-only fragment clears the slot;
    /// suggestion queries are suppressed entirely for empty input.
    pub fn note_input(&mut self, fragment: &str, now: Instant) {
        if fragment.trim().is_empty() {
            self.pending = None;
            return;
        }

        self.pending = Some(PendingQuery {
            fragment: fragment.to_string(),
            due_at: now + self.quiet_period,
        });
    }

    /// Releases the pending fragment once its quiet period has elapsed.
    ///
    /// Returns the fragment at most once; the slot is emptied on release.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.due_at => self.pending.take().map(|p| p.fragment),
            _ => None,
        }
    }

    /// Drops any pending query without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a query is currently waiting for its quiet period to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for SuggestionDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = SuggestionDebouncer::new();

        debouncer.note_input("brea", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(299)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(300)),
            Some("brea".to_string())
        );
    }

    #[test]
    fn test_fragment_is_released_at_most_once() {
        let start = Instant::now();
        let mut debouncer = SuggestionDebouncer::new();

        debouncer.note_input("brea", start);
        let later = start + Duration::from_millis(400);

        assert_eq!(debouncer.poll(later), Some("brea".to_string()));
        assert_eq!(debouncer.poll(later), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_retype_cancels_instead_of_delaying() {
        let start = Instant::now();
        let mut debouncer = SuggestionDebouncer::new();

        debouncer.note_input("br", start);
        debouncer.note_input("brea", start + Duration::from_millis(100));

        // The first fragment's deadline passes without anything firing.
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), None);
        // Only the latest fragment fires, a full quiet period after it was
        // typed.
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(400)),
            Some("brea".to_string())
        );
    }

    #[test]
    fn test_empty_input_clears_pending_query() {
        let start = Instant::now();
        let mut debouncer = SuggestionDebouncer::new();

        debouncer.note_input("brea", start);
        debouncer.note_input("   ", start + Duration::from_millis(100));

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_cancel_drops_pending_query() {
        let start = Instant::now();
        let mut debouncer = SuggestionDebouncer::new();

        debouncer.note_input("brea", start);
        debouncer.cancel();

        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_custom_quiet_period() {
        let start = Instant::now();
        let mut debouncer = SuggestionDebouncer::with_quiet_period(Duration::from_millis(50));

        debouncer.note_input("x", start);

        assert_eq!(
            debouncer.poll(start + Duration::from_millis(50)),
            Some("x".to_string())
        );
    }
}

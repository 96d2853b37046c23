//! Search debouncing with generation tokens.
//!
//! Every submitted query bumps a generation counter and waits out the quiet
//! window. When the wait ends, the query is emitted only if no newer query
//! was submitted meanwhile and it differs from the last emitted one.
//! Superseded waits are not aborted; they wake up, see a newer generation
//! and resolve to `None`.

use shelf_engine::Generation;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

/// Default quiet window before a query takes effect.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct DebounceState {
    generation: Generation,
    /// Last query that took effect; the empty query is in effect initially
    last_effective: String,
}

/// Debouncer for the search box.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    window: Duration,
    state: Rc<RefCell<DebounceState>>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: Rc::new(RefCell::new(DebounceState::default())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Submit raw input.
    ///
    /// The generation and deadline are taken now, when `submit` is called,
    /// not when the returned future is first polled. The future resolves to
    /// the trimmed query once it should take effect, or `None` if it was
    /// superseded or unchanged.
    pub fn submit(&self, raw: &str) -> impl Future<Output = Option<String>> + 'static {
        let query = raw.trim().to_string();
        let deadline = Instant::now() + self.window;
        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.generation
        };
        let state = Rc::clone(&self.state);

        async move {
            tokio::time::sleep_until(deadline).await;

            let mut state = state.borrow_mut();
            if state.generation != generation {
                tracing::debug!(
                    generation,
                    latest = state.generation,
                    "Search query superseded"
                );
                return None;
            }
            if state.last_effective == query {
                return None;
            }

            state.last_effective = query.clone();
            Some(query)
        }
    }

    /// Generation of the most recent submission.
    pub fn generation(&self) -> Generation {
        self.state.borrow().generation
    }

    /// The query currently in effect.
    pub fn last_effective(&self) -> String {
        self.state.borrow().last_effective.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_emit_only_last() {
        let debouncer = SearchDebouncer::default();

        let r = debouncer.submit("r");
        tokio::time::advance(STEP).await;
        let re = debouncer.submit("re");
        tokio::time::advance(STEP).await;
        let rea = debouncer.submit("rea");

        let (r, re, rea) = tokio::join!(r, re, rea);
        assert_eq!(r, None);
        assert_eq!(re, None);
        assert_eq!(rea, Some("rea".to_string()));
        assert_eq!(debouncer.generation(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_full_window_from_last_keystroke() {
        let debouncer = SearchDebouncer::default();
        let start = Instant::now();

        assert_eq!(debouncer.submit("rust").await, Some("rust".to_string()));
        assert!(start.elapsed() >= DEFAULT_DEBOUNCE);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_query_is_not_emitted() {
        let debouncer = SearchDebouncer::default();

        // Empty input matches the initial effective query
        assert_eq!(debouncer.submit("   ").await, None);

        assert_eq!(debouncer.submit("rust").await, Some("rust".to_string()));
        assert_eq!(debouncer.submit(" rust ").await, None);
        assert_eq!(debouncer.last_effective(), "rust");

        assert_eq!(debouncer.submit("").await, Some(String::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_each_emit() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(50));

        let first = debouncer.submit("a");
        assert_eq!(first.await, Some("a".to_string()));

        let second = debouncer.submit("ab");
        tokio::time::advance(Duration::from_millis(10)).await;
        let third = debouncer.submit("abc");
        let (second, third) = tokio::join!(second, third);

        assert_eq!(second, None);
        assert_eq!(third, Some("abc".to_string()));
    }
}

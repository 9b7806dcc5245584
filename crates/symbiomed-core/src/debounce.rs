//! Debounced scheduling for search-as-you-type.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::system::SearchScope;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Runs a task once input has been quiet for a fixed period.
///
/// Each call to [`Debouncer::schedule`] aborts the task armed by the previous
/// call, so only the latest input is ever acted on. Must be used from within
/// a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let quiet_period = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            task.await;
        }));
    }

    /// Abort the pending task, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Gates and caps suggestion lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionPolicy {
    pub min_len: usize,
    pub single_cap: usize,
    pub multi_cap: usize,
    pub quiet_period: Duration,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            min_len: 2,
            single_cap: 5,
            multi_cap: 10,
            quiet_period: DEFAULT_QUIET_PERIOD,
        }
    }
}

impl SuggestionPolicy {
    /// Whether `input` is long enough to be looked up
    pub fn accepts(&self, input: &str) -> bool {
        input.trim().chars().count() >= self.min_len
    }

    pub fn cap(&self, scope: SearchScope) -> usize {
        if scope.is_multi() {
            self.multi_cap
        } else {
            self.single_cap
        }
    }
}

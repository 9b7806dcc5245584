//! Per-screen request state.
//!
//! A consumer issuing a request repeatedly (the suggestion service, a
//! screen) owns one [`RequestSlot`] for it. A slot moves `Idle -> Loading -> {Success | Failed}` and is reset to
//! `Loading` whenever a new request starts. Only the most recently started
//! request may publish its result.

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Handle identifying one started request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug)]
pub struct RequestSlot<T> {
    latest: u64,
    state: RequestState<T>,
}

impl<T> RequestSlot<T> {
    pub fn new() -> Self {
        Self {
            latest: 0,
            state: RequestState::Idle,
        }
    }

    /// Start a new request, superseding any request still in flight
    pub fn begin(&mut self) -> RequestTicket {
        self.latest += 1;
        self.state = RequestState::Loading;
        RequestTicket(self.latest)
    }

    /// Back to `Idle`; results of requests still in flight are dropped
    pub fn reset(&mut self) {
        self.latest += 1;
        self.state = RequestState::Idle;
    }

    /// Publish a result. Returns `false` and drops the result when a newer
    /// request has been started since `ticket` was issued.
    pub fn finish<E: Display>(&mut self, ticket: RequestTicket, result: Result<T, E>) -> bool {
        if ticket.0 != self.latest {
            tracing::debug!(ticket = ticket.0, latest = self.latest, "dropping stale result");
            return false;
        }
        self.state = match result {
            Ok(value) => RequestState::Success(value),
            Err(e) => RequestState::Failed(e.to_string()),
        };
        true
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn into_state(self) -> RequestState<T> {
        self.state
    }
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        assert_eq!(slot.state(), &RequestState::Idle);

        let ticket = slot.begin();
        assert!(slot.state().is_loading());

        assert!(slot.finish::<String>(ticket, Ok(7)));
        assert_eq!(slot.state().value(), Some(&7));
    }

    #[test]
    fn test_failure_message() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let ticket = slot.begin();
        slot.finish(ticket, Err("API Error: 500"));
        assert_eq!(slot.state().error(), Some("API Error: 500"));
    }

    #[test]
    fn test_begin_resets_previous_result() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let ticket = slot.begin();
        slot.finish::<String>(ticket, Ok(1));
        slot.begin();
        assert_eq!(slot.state(), &RequestState::Loading);
    }

    #[test]
    fn test_reset_drops_in_flight_result() {
        let mut slot: RequestSlot<u32> = RequestSlot::new();
        let ticket = slot.begin();
        slot.reset();
        assert!(!slot.finish::<String>(ticket, Ok(3)));
        assert_eq!(slot.state(), &RequestState::Idle);
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut slot: RequestSlot<&str> = RequestSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.finish::<String>(second, Ok("second")));
        assert!(!slot.finish::<String>(first, Ok("first")));
        assert_eq!(slot.into_state(), RequestState::Success("second"));
    }

    #[test]
    fn test_slow_earlier_request_loses_race() {
        use std::sync::{Arc, Mutex};
        use std::time::Duration;

        let slot = Arc::new(Mutex::new(RequestSlot::<&str>::new()));
        let first = slot.lock().unwrap().begin();
        let second = slot.lock().unwrap().begin();

        let published = tokio_test::block_on(async {
            let slow = async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                slot.lock().unwrap().finish::<String>(first, Ok("d"))
            };
            let fast = async { slot.lock().unwrap().finish::<String>(second, Ok("dosha")) };
            tokio::join!(slow, fast)
        });

        assert_eq!(published, (false, true));
        assert_eq!(slot.lock().unwrap().state(), &RequestState::Success("dosha"));
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use symbiomed_core::{
    Debouncer, RequestSlot, RequestState, SearchResult, SearchScope, SuggestionPolicy,
};
use tokio::sync::watch;

use crate::client::TerminologyClient;

/// Latest suggestion state published by [`SuggestionService`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    pub query: String,
    pub state: RequestState<Vec<SearchResult>>,
}

/// Search-as-you-type over the terminology server.
///
/// Feed every change of the input box to [`SuggestionService::input`]. Once
/// the input has been quiet for the policy's quiet period, a capped search
/// for the latest text is issued and its outcome is published on the watch
/// channel returned by [`SuggestionService::new`]. A result is published only
/// while its request is still the latest one.
pub struct SuggestionService {
    client: TerminologyClient,
    scope: SearchScope,
    policy: SuggestionPolicy,
    debouncer: Debouncer,
    slot: Arc<Mutex<RequestSlot<Vec<SearchResult>>>>,
    tx: watch::Sender<Suggestions>,
}

impl SuggestionService {
    pub fn new(
        client: TerminologyClient,
        scope: SearchScope,
        policy: SuggestionPolicy,
    ) -> (Self, watch::Receiver<Suggestions>) {
        let (tx, rx) = watch::channel(Suggestions::default());
        let service = Self {
            client,
            scope,
            policy,
            debouncer: Debouncer::new(policy.quiet_period),
            slot: Arc::new(Mutex::new(RequestSlot::new())),
            tx,
        };
        (service, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.tx.subscribe()
    }

    pub fn input(&mut self, text: &str) {
        let query = text.trim().to_string();

        if !self.policy.accepts(&query) {
            self.debouncer.cancel();
            self.slot.lock().reset();
            self.tx.send_replace(Suggestions {
                query,
                state: RequestState::Idle,
            });
            return;
        }

        let ticket = self.slot.lock().begin();
        let slot = self.slot.clone();
        let client = self.client.clone();
        let tx = self.tx.clone();
        let scope = self.scope;
        let cap = self.policy.cap(scope);

        self.debouncer.schedule(async move {
            tx.send_replace(Suggestions {
                query: query.clone(),
                state: RequestState::Loading,
            });

            let result = client.search(scope, &query, Some(cap)).await;
            if let Err(e) = &result {
                tracing::debug!(query = %query, error = %e, "suggestion fetch failed");
            }

            let mut slot = slot.lock();
            if slot.finish(ticket, result) {
                let state = slot.state().clone();
                tx.send_replace(Suggestions { query, state });
            }
        });
    }

    /// Drop any pending lookup
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.slot.lock().reset();
        self.tx.send_replace(Suggestions::default());
    }
}

//! Per-caller search state with last-submitted-wins semantics.
//!
//! A session tracks the outcome of the caller's most recent search. Starting a
//! new search supersedes any pending one: in-flight calls are not cancelled, but
//! their results are dropped when they arrive.

use crate::models::SearchOutcome;
use crate::normalizer::SearchRequest;
use crate::orchestrator::LookupOrchestrator;
use std::sync::Mutex;

/// Identifies one submitted search within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    outcome: SearchOutcome,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    state: Mutex<SessionState>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current outcome (idle until the first search starts).
    pub fn outcome(&self) -> SearchOutcome {
        self.lock().outcome.clone()
    }

    /// Starts a new search, superseding any pending one, and moves to `Loading`.
    pub fn begin(&self) -> SearchTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.outcome = SearchOutcome::Loading;
        SearchTicket(state.generation)
    }

    /// Records the outcome of `ticket`'s search.
    ///
    /// Returns `false` and leaves the state untouched when a newer search has
    /// started (or the session was reset) since the ticket was issued.
    pub fn resolve(&self, ticket: SearchTicket, outcome: SearchOutcome) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.0 {
            tracing::debug!(
                "Discarding stale search result (ticket {}, current {})",
                ticket.0,
                state.generation
            );
            return false;
        }
        state.outcome = outcome;
        true
    }

    /// Back to `Idle`; any pending search is discarded on arrival.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.outcome = SearchOutcome::Idle;
    }

    /// Runs `request` through the orchestrator and records its outcome.
    ///
    /// Returns the outcome the session holds afterwards, which is the newer
    /// search's state if this one was superseded while in flight.
    pub async fn submit(
        &self,
        orchestrator: &LookupOrchestrator,
        request: &SearchRequest,
    ) -> SearchOutcome {
        let ticket = self.begin();
        let outcome = orchestrator.search(request).await;
        self.resolve(ticket, outcome);
        self.outcome()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // Poisoning cannot leave SessionState half-updated, so recover the guard.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

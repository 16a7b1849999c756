//! Authenticated terminology search.
//!
//! One search replaces the previous one: the shown results are cleared before
//! the request leaves, and a response is only applied if no newer search or
//! reset happened while it was in flight.

use std::sync::Arc;

use shared::{
    domain::{SearchQuery, SearchResultItem, Session},
    error::ValidationError,
    protocol::{SearchResponse, SEARCH_PATH},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    outcome::{ControllerState, RequestCycle, RequestOutcome, Ticket},
    transport::{ApiRequest, ApiResponse, Transport, TransportError},
};

pub const SEARCH_FAILED: &str = "Search failed";

pub type SearchOutcome = RequestOutcome<Vec<SearchResultItem>>;

/// A search that passed local checks and is waiting to be sent.
#[derive(Debug)]
pub struct PendingSearch {
    ticket: Ticket,
    term: String,
    token: String,
}

pub struct SearchController {
    transport: Arc<dyn Transport>,
    cycle: Mutex<RequestCycle<Vec<SearchResultItem>>>,
}

impl SearchController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cycle: Mutex::new(RequestCycle::new()),
        }
    }

    /// Runs one search for `term` on behalf of `session`.
    ///
    /// Returns `None` when the response arrived after [`Self::invalidate`] or
    /// after a newer search started; such a response is dropped.
    pub async fn search(&self, term: &str, session: &Session) -> Option<SearchOutcome> {
        match self.prepare(term, session).await {
            Ok(pending) => self.send(pending).await,
            Err(outcome) => Some(outcome),
        }
    }

    /// Starts a new attempt and runs the local checks. On success the attempt
    /// is in flight and the returned [`PendingSearch`] carries its ticket; on
    /// failure the attempt is already finished with the returned outcome.
    ///
    /// Callers that must order the dispatch against a session change hold
    /// their own lock across this call; nothing here touches the network.
    pub async fn prepare(
        &self,
        term: &str,
        session: &Session,
    ) -> Result<PendingSearch, SearchOutcome> {
        let query = SearchQuery::new(term);
        let mut cycle = self.cycle.lock().await;
        cycle.begin();

        let Some(term) = query.normalized() else {
            cycle.reject(ValidationError::EmptyTerm);
            return Err(RequestOutcome::ValidationError(ValidationError::EmptyTerm));
        };
        if !session.has_token() {
            cycle.unauthenticated();
            return Err(RequestOutcome::AuthError);
        }
        Ok(PendingSearch {
            ticket: cycle.dispatch(),
            term: term.to_string(),
            token: session.token.clone(),
        })
    }

    /// Sends a prepared search. A search invalidated since it was prepared is
    /// dropped without a request.
    pub async fn send(&self, pending: PendingSearch) -> Option<SearchOutcome> {
        let PendingSearch {
            ticket,
            term,
            token,
        } = pending;
        if !self.cycle.lock().await.is_live(ticket) {
            debug!(term = %term, generation = ticket.generation(), "search: dropped before dispatch");
            return None;
        }

        debug!(term = %term, generation = ticket.generation(), "search: dispatching");
        let request = ApiRequest::get(SEARCH_PATH)
            .with_query("term", term.as_str())
            .with_bearer(token);
        let outcome = map_search_response(self.transport.send(request).await);

        let mut cycle = self.cycle.lock().await;
        if !cycle.complete(ticket, outcome.clone()) {
            debug!(
                term = %term,
                generation = ticket.generation(),
                "search: discarding stale response"
            );
            return None;
        }
        match &outcome {
            RequestOutcome::Success(items) => {
                info!(term = %term, results = items.len(), "search: completed")
            }
            RequestOutcome::NetworkError(message) => {
                warn!(term = %term, "search: failed: {message}")
            }
            _ => {}
        }
        Some(outcome)
    }

    /// Drops any in-flight search and returns to idle.
    pub async fn invalidate(&self) {
        self.cycle.lock().await.invalidate();
    }

    pub async fn state(&self) -> ControllerState<Vec<SearchResultItem>> {
        self.cycle.lock().await.state().clone()
    }

    pub async fn is_in_flight(&self) -> bool {
        self.cycle.lock().await.is_in_flight()
    }
}

/// Folds a transport result into a search outcome. Never fails: anything
/// unexpected becomes the generic network error.
pub fn map_search_response(result: Result<ApiResponse, TransportError>) -> SearchOutcome {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            warn!("search: transport failure: {err}");
            return RequestOutcome::NetworkError(SEARCH_FAILED.to_string());
        }
    };

    if response.status == 401 || response.status == 403 {
        return RequestOutcome::AuthError;
    }
    if !response.is_success() {
        return RequestOutcome::NetworkError(
            response
                .service_message()
                .unwrap_or_else(|| SEARCH_FAILED.to_string()),
        );
    }

    match serde_json::from_str::<SearchResponse>(&response.body) {
        Ok(SearchResponse {
            results: Some(items),
        }) if !items.is_empty() => RequestOutcome::Success(items),
        Ok(_) => RequestOutcome::ValidationError(ValidationError::NoResults),
        Err(err) => {
            warn!("search: malformed response body: {err}");
            RequestOutcome::NetworkError(SEARCH_FAILED.to_string())
        }
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;

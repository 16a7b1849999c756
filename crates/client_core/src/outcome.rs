//! Request lifecycle shared by the search and registration controllers.
//!
//! [`ControllerState`] is advanced only through [`transition`], a pure function,
//! and [`RequestCycle`] pairs it with a generation counter. Every dispatch hands
//! out a [`Ticket`]; a response is applied only if its ticket still matches the
//! current generation, so responses that arrive after a reset or a newer request
//! are dropped.

use shared::error::ValidationError;

/// Result of one controller operation as seen by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    Pending,
    Success(T),
    ValidationError(ValidationError),
    AuthError,
    NetworkError(String),
}

impl<T> RequestOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Inline message for failures. `AuthError` has none: it redirects instead.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::ValidationError(err) => Some(err.to_string()),
            Self::NetworkError(message) => Some(message.clone()),
            Self::Pending | Self::Success(_) | Self::AuthError => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Validation(ValidationError),
    Auth,
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState<T> {
    Idle,
    Validating,
    InFlight,
    Succeeded(T),
    Failed(Failure),
}

impl<T> Default for ControllerState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T: Clone> ControllerState<T> {
    /// Outcome view of the state. `Idle` has nothing to show yet.
    pub fn outcome(&self) -> Option<RequestOutcome<T>> {
        match self {
            Self::Idle => None,
            Self::Validating | Self::InFlight => Some(RequestOutcome::Pending),
            Self::Succeeded(payload) => Some(RequestOutcome::Success(payload.clone())),
            Self::Failed(Failure::Validation(err)) => Some(RequestOutcome::ValidationError(*err)),
            Self::Failed(Failure::Auth) => Some(RequestOutcome::AuthError),
            Self::Failed(Failure::Network(message)) => {
                Some(RequestOutcome::NetworkError(message.clone()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<T> {
    Submit,
    Rejected(ValidationError),
    Unauthenticated,
    Dispatched,
    Completed(RequestOutcome<T>),
    Reset,
}

/// Pure transition function. Events that make no sense in the current state
/// leave it untouched.
pub fn transition<T>(state: ControllerState<T>, event: Event<T>) -> ControllerState<T> {
    use ControllerState as S;

    match (state, event) {
        (_, Event::Reset) => S::Idle,
        // Any shown result or error is dropped as soon as a new attempt starts,
        // including one still waiting on a response.
        (_, Event::Submit) => S::Validating,
        (S::Validating, Event::Rejected(err)) => S::Failed(Failure::Validation(err)),
        (S::Validating, Event::Unauthenticated) => S::Failed(Failure::Auth),
        (S::Validating, Event::Dispatched) => S::InFlight,
        (S::InFlight, Event::Completed(outcome)) => match outcome {
            RequestOutcome::Pending => S::InFlight,
            RequestOutcome::Success(payload) => S::Succeeded(payload),
            RequestOutcome::ValidationError(err) => S::Failed(Failure::Validation(err)),
            RequestOutcome::AuthError => S::Failed(Failure::Auth),
            RequestOutcome::NetworkError(message) => S::Failed(Failure::Network(message)),
        },
        (state, _) => state,
    }
}

/// Proof that a dispatch happened in a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct RequestCycle<T> {
    state: ControllerState<T>,
    generation: u64,
}

impl<T> Default for RequestCycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestCycle<T> {
    pub fn new() -> Self {
        Self {
            state: ControllerState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ControllerState<T> {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, ControllerState::InFlight)
    }

    fn apply(&mut self, event: Event<T>) {
        let state = std::mem::replace(&mut self.state, ControllerState::Idle);
        self.state = transition(state, event);
    }

    /// Starts a new attempt. The previous result is cleared immediately and a
    /// request still in flight from an earlier attempt is superseded.
    pub fn begin(&mut self) {
        self.generation += 1;
        self.apply(Event::Submit);
    }

    pub fn reject(&mut self, err: ValidationError) {
        self.apply(Event::Rejected(err));
    }

    /// Ends the attempt before dispatch because there is no usable session.
    pub fn unauthenticated(&mut self) {
        self.apply(Event::Unauthenticated);
    }

    pub fn dispatch(&mut self) -> Ticket {
        self.apply(Event::Dispatched);
        Ticket {
            generation: self.generation,
        }
    }

    /// Whether `ticket` still belongs to the attempt in flight.
    pub fn is_live(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && self.is_in_flight()
    }

    /// Applies a response. Returns `false` and leaves state alone if the ticket
    /// belongs to an older generation.
    pub fn complete(&mut self, ticket: Ticket, outcome: RequestOutcome<T>) -> bool {
        if !self.is_live(ticket) {
            return false;
        }
        self.apply(Event::Completed(outcome));
        true
    }

    /// Back to idle; any outstanding ticket becomes stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.apply(Event::Reset);
    }
}

#[cfg(test)]
#[path = "tests/outcome_tests.rs"]
mod tests;

use std::sync::Arc;

use shared::{
    domain::RegistrationForm,
    protocol::{RegisterRequest, REGISTER_PATH},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    outcome::{ControllerState, RequestCycle, RequestOutcome},
    route::Route,
    transport::{ApiRequest, ApiResponse, Transport, TransportError},
    validation::validate,
};

pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const REGISTRATION_NOTICE: &str = "Registration successful! Please login.";

/// What the caller needs after an account was created. Registration never
/// signs the user in; the caller navigates to `redirect` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub username: String,
    pub redirect: Route,
    pub notice: &'static str,
}

pub type RegistrationOutcome = RequestOutcome<RegistrationReceipt>;

pub struct RegistrationController {
    transport: Arc<dyn Transport>,
    cycle: Mutex<RequestCycle<RegistrationReceipt>>,
}

impl RegistrationController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cycle: Mutex::new(RequestCycle::new()),
        }
    }

    /// Validates `form` locally and, if it passes, submits it.
    ///
    /// Returns `None` when the response arrived after [`Self::invalidate`] or
    /// after a newer submission; such a response is dropped.
    pub async fn register(&self, form: &RegistrationForm) -> Option<RegistrationOutcome> {
        let ticket = {
            let mut cycle = self.cycle.lock().await;
            cycle.begin();
            if let Err(err) = validate(form) {
                debug!(reason = err.code(), "register: rejected locally");
                cycle.reject(err);
                return Some(RequestOutcome::ValidationError(err));
            }
            cycle.dispatch()
        };

        let body = match serde_json::to_value(RegisterRequest::from(form)) {
            Ok(body) => body,
            Err(err) => {
                warn!("register: failed to encode request: {err}");
                let outcome = RequestOutcome::NetworkError(REGISTRATION_FAILED.to_string());
                self.cycle.lock().await.complete(ticket, outcome.clone());
                return Some(outcome);
            }
        };

        debug!(username = %form.username, generation = ticket.generation(), "register: dispatching");
        let result = self.transport.send(ApiRequest::post(REGISTER_PATH, body)).await;
        let outcome = map_register_response(result, &form.username);

        let mut cycle = self.cycle.lock().await;
        if !cycle.complete(ticket, outcome.clone()) {
            debug!(username = %form.username, "register: discarding stale response");
            return None;
        }
        match &outcome {
            RequestOutcome::Success(_) => info!(username = %form.username, "register: account created"),
            RequestOutcome::NetworkError(message) => {
                warn!(username = %form.username, "register: failed: {message}")
            }
            _ => {}
        }
        Some(outcome)
    }

    pub async fn invalidate(&self) {
        self.cycle.lock().await.invalidate();
    }

    pub async fn state(&self) -> ControllerState<RegistrationReceipt> {
        self.cycle.lock().await.state().clone()
    }

    pub async fn is_in_flight(&self) -> bool {
        self.cycle.lock().await.is_in_flight()
    }
}

/// Only `201 Created` counts as success; everything else is a network error,
/// preferring the service's own message.
pub fn map_register_response(
    result: Result<ApiResponse, TransportError>,
    username: &str,
) -> RegistrationOutcome {
    match result {
        Ok(response) if response.status == 201 => RequestOutcome::Success(RegistrationReceipt {
            username: username.to_string(),
            redirect: Route::Login,
            notice: REGISTRATION_NOTICE,
        }),
        Ok(response) => RequestOutcome::NetworkError(
            response
                .service_message()
                .unwrap_or_else(|| REGISTRATION_FAILED.to_string()),
        ),
        Err(err) => {
            warn!("register: transport failure: {err}");
            RequestOutcome::NetworkError(REGISTRATION_FAILED.to_string())
        }
    }
}

#[cfg(test)]
#[path = "tests/registration_tests.rs"]
mod tests;

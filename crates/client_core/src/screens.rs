//! View-models for the two interactive screens. They hold exactly what a view
//! renders and turn controller outcomes into messages and navigation, so any
//! front end (terminal, web, desktop) only draws.

use std::sync::Arc;

use anyhow::Result;
use shared::domain::{FormField, RegistrationForm, SearchResultItem, Session, StrengthResult};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    outcome::RequestOutcome,
    registration::RegistrationController,
    route::Route,
    search::SearchController,
    session::{GuardDecision, SessionGuard, SessionStore},
    strength,
    transport::Transport,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub notice: Option<&'static str>,
}

struct RegisterView {
    form: RegistrationForm,
    strength: StrengthResult,
    error: Option<String>,
}

impl Default for RegisterView {
    fn default() -> Self {
        Self {
            form: RegistrationForm::default(),
            strength: strength::score(""),
            error: None,
        }
    }
}

/// Registration screen. All methods take `&self` so a view can read
/// [`Self::is_submitting`] or call [`Self::leave`] while a submit is pending.
pub struct RegisterScreen {
    controller: RegistrationController,
    view: Mutex<RegisterView>,
}

impl RegisterScreen {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            controller: RegistrationController::new(transport),
            view: Mutex::new(RegisterView::default()),
        }
    }

    pub async fn edit(&self, field: FormField, value: impl Into<String>) {
        let mut view = self.view.lock().await;
        view.form.set(field, value);
        if field == FormField::Password {
            view.strength = strength::score(&view.form.password);
        }
    }

    pub async fn form(&self) -> RegistrationForm {
        self.view.lock().await.form.clone()
    }

    pub async fn strength(&self) -> StrengthResult {
        self.view.lock().await.strength.clone()
    }

    pub async fn suggestions_visible(&self) -> bool {
        strength::suggestions_visible(&self.view.lock().await.strength)
    }

    pub async fn error(&self) -> Option<String> {
        self.view.lock().await.error.clone()
    }

    pub async fn is_submitting(&self) -> bool {
        self.controller.is_in_flight().await
    }

    /// Submits the form. On success the form is discarded and the login route
    /// is returned together with the success notice. A response that lands
    /// after [`Self::leave`] is ignored.
    pub async fn submit(&self) -> Option<Navigation> {
        let form = {
            let mut view = self.view.lock().await;
            view.error = None;
            view.form.clone()
        };

        let outcome = self.controller.register(&form).await?;
        let mut view = self.view.lock().await;
        match outcome {
            RequestOutcome::Success(receipt) => {
                *view = RegisterView::default();
                Some(Navigation {
                    route: receipt.redirect,
                    notice: Some(receipt.notice),
                })
            }
            other => {
                view.error = other.error_message();
                None
            }
        }
    }

    /// Leaving the screen drops the form and any response still on its way.
    pub async fn leave(&self) {
        self.controller.invalidate().await;
        *self.view.lock().await = RegisterView::default();
    }
}

#[derive(Default)]
struct SearchView {
    session: Option<Session>,
    term: String,
    results: Vec<SearchResultItem>,
    error: Option<String>,
}

impl SearchView {
    fn clear(&mut self) {
        self.results.clear();
        self.error = None;
    }
}

/// Protected search screen. Every entry point consults the session guard
/// first; once the guard redirects, in-flight searches are invalidated so
/// their responses never render.
pub struct SearchScreen {
    guard: Mutex<SessionGuard>,
    controller: SearchController,
    view: Mutex<SearchView>,
}

impl SearchScreen {
    pub fn new(store: Arc<dyn SessionStore>, transport: Arc<dyn Transport>) -> Self {
        Self {
            guard: Mutex::new(SessionGuard::new(store)),
            controller: SearchController::new(transport),
            view: Mutex::new(SearchView::default()),
        }
    }

    pub async fn mount(&self) -> GuardDecision {
        let decision = self.guard.lock().await.enter();
        self.apply_decision(&decision).await;
        decision
    }

    /// Call when the stored session may have changed elsewhere. Returns the
    /// route to navigate to if the user is no longer signed in.
    pub async fn session_changed(&self) -> Option<Route> {
        let decision = self.guard.lock().await.recheck()?;
        self.apply_decision(&decision).await;
        match decision {
            GuardDecision::Redirect(route) => Some(route),
            GuardDecision::Render(_) => None,
        }
    }

    /// Runs a search. Returns a route when the screen must be left instead.
    ///
    /// The session is read and the attempt dispatched under the guard lock, so
    /// a concurrent [`Self::logout`] either runs first and the search never
    /// starts, or runs after and invalidates it before anything is sent.
    pub async fn submit(&self, term: &str) -> Option<Route> {
        let prepared = {
            let guard = self.guard.lock().await;
            let Some(session) = guard.current() else {
                drop(guard);
                self.teardown().await;
                return Some(Route::Login);
            };
            self.controller.prepare(term, &session).await
        };

        {
            let mut view = self.view.lock().await;
            view.clear();
            view.term = term.to_string();
        }

        let outcome = match prepared {
            Ok(pending) => self.controller.send(pending).await?,
            Err(outcome) => outcome,
        };
        let mut view = self.view.lock().await;
        match outcome {
            RequestOutcome::Success(items) => {
                view.results = items;
                None
            }
            RequestOutcome::AuthError => {
                view.clear();
                drop(view);
                self.controller.invalidate().await;
                Some(Route::Login)
            }
            other => {
                view.results.clear();
                view.error = other.error_message();
                None
            }
        }
    }

    /// Clears the stored session and any search state, then returns the login
    /// route. The controller is invalidated before the guard's next check can
    /// observe the missing token.
    pub async fn logout(&self) -> Result<Route> {
        let mut guard = self.guard.lock().await;
        self.controller.invalidate().await;
        let route = guard.logout()?;
        drop(guard);
        *self.view.lock().await = SearchView::default();
        Ok(route)
    }

    pub async fn is_searching(&self) -> bool {
        self.controller.is_in_flight().await
    }

    pub async fn results(&self) -> Vec<SearchResultItem> {
        self.view.lock().await.results.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.view.lock().await.error.clone()
    }

    pub async fn results_heading(&self) -> Option<String> {
        let view = self.view.lock().await;
        (!view.results.is_empty()).then(|| format!("Results for \"{}\"", view.term))
    }

    pub async fn greeting(&self) -> Option<String> {
        let view = self.view.lock().await;
        view.session
            .as_ref()
            .map(|s| format!("Welcome, {}", s.username))
    }

    async fn apply_decision(&self, decision: &GuardDecision) {
        match decision {
            GuardDecision::Render(session) => {
                self.view.lock().await.session = Some(session.clone());
            }
            GuardDecision::Redirect(route) => {
                debug!(route = %route, "search screen: redirecting");
                self.teardown().await;
            }
        }
    }

    async fn teardown(&self) {
        self.controller.invalidate().await;
        *self.view.lock().await = SearchView::default();
    }
}

#[cfg(test)]
#[path = "tests/screens_tests.rs"]
mod tests;

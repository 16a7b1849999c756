use std::sync::Arc;

use anyhow::{Context, Result};
use shared::domain::Session;
use tracing::info;

pub mod outcome;
pub mod registration;
pub mod route;
pub mod screens;
pub mod search;
pub mod session;
pub mod settings;
pub mod strength;
pub mod transport;
pub mod validation;

pub use outcome::{ControllerState, RequestOutcome};
pub use registration::{RegistrationController, RegistrationReceipt};
pub use route::Route;
pub use screens::{Navigation, RegisterScreen, SearchScreen};
pub use search::SearchController;
pub use session::{
    FileSessionStore, GuardDecision, MemorySessionStore, SessionGuard, SessionStore,
};
pub use settings::{load_settings, ClientSettings};
pub use transport::{HttpTransport, Transport, TransportError};

/// Entry point for front ends: owns the transport and the session store and
/// hands out screens wired to both.
pub struct TerminologyClient {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl TerminologyClient {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self { transport, store }
    }

    /// Builds an HTTP client and a file-backed session store from `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        settings.validate()?;
        let transport = HttpTransport::new(&settings.api_base_url, settings.request_timeout())
            .context("failed to build http transport")?;
        let store = FileSessionStore::new(settings.session_path.clone());
        info!(
            api_base_url = %settings.api_base_url,
            session_path = %settings.session_path.display(),
            "terminology client configured"
        );
        Ok(Self::new(Arc::new(transport), Arc::new(store)))
    }

    pub fn register_screen(&self) -> RegisterScreen {
        RegisterScreen::new(self.transport.clone())
    }

    pub fn search_screen(&self) -> SearchScreen {
        SearchScreen::new(self.store.clone(), self.transport.clone())
    }

    /// Persists a session issued by the login flow. Token and username are
    /// written together.
    pub fn sign_in(&self, session: &Session) -> Result<()> {
        self.store.store(session)?;
        info!(username = %session.username, "session stored");
        Ok(())
    }

    pub fn current_session(&self) -> Option<Session> {
        SessionGuard::new(self.store.clone()).current()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

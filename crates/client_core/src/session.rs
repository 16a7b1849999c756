//! Client-side session persistence and the guard in front of the protected view.
//!
//! A [`Session`] is always read, written and cleared as a whole; no store exposes
//! a way to touch the token without the username. [`SessionGuard`] reads the
//! store on entry and again whenever the observed token changes, so a logout
//! performed elsewhere sends the protected view back to the login route.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use shared::domain::Session;
use tracing::{debug, info, warn};

use crate::route::Route;

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn store(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn store(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// Keeps the session in a small JSON document. Writes go through a sibling
/// temp file and a rename so readers never see half a session.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read session file {}", self.path.display()))
            }
        };
        let doc: SessionDocument = serde_json::from_str(&raw)
            .with_context(|| format!("malformed session file {}", self.path.display()))?;
        match (doc.token, doc.username) {
            (Some(token), Some(username)) => Ok(Some(Session { token, username })),
            _ => Ok(None),
        }
    }

    fn store(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let doc = SessionDocument {
            token: Some(session.token.clone()),
            username: Some(session.username.clone()),
        };
        let raw = serde_json::to_string_pretty(&doc).context("failed to encode session")?;
        let temp = self.temp_path();
        fs::write(&temp, raw).with_context(|| format!("failed to write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove session file {}", self.path.display())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Session),
    Redirect(Route),
}

pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    observed_token: Option<String>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            observed_token: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Current session, if it carries a token. Unreadable stores count as
    /// signed out.
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session.filter(Session::has_token),
            Err(err) => {
                warn!("session: failed to read store, treating as signed out: {err:#}");
                None
            }
        }
    }

    /// Runs on entering the protected view.
    pub fn enter(&mut self) -> GuardDecision {
        let session = self.current();
        self.observed_token = session.as_ref().map(|s| s.token.clone());
        decide(session)
    }

    /// Re-runs the check only if the token differs from the one last observed.
    pub fn recheck(&mut self) -> Option<GuardDecision> {
        let session = self.current();
        let token = session.as_ref().map(|s| s.token.clone());
        if token == self.observed_token {
            return None;
        }
        debug!(
            signed_in = token.is_some(),
            "session: token changed, re-running guard"
        );
        self.observed_token = token;
        Some(decide(session))
    }

    /// Clears token and username together, then hands back the route to show.
    pub fn logout(&mut self) -> Result<Route> {
        let username = self.current().map(|s| s.username);
        self.store.clear().context("failed to clear session")?;
        self.observed_token = None;
        info!(username = username.as_deref().unwrap_or(""), "session: logged out");
        Ok(Route::Login)
    }
}

fn decide(session: Option<Session>) -> GuardDecision {
    match session {
        Some(session) => GuardDecision::Render(session),
        None => GuardDecision::Redirect(Route::Login),
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

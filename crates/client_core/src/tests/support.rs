//! Fake transport shared by controller and screen tests.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, Notify};

use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

pub(crate) enum Reply {
    Respond(u16, String),
    Fail(TransportError),
}

#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    pub(crate) requests: Arc<Mutex<Vec<ApiRequest>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn responding(status: u16, body: Value) -> Self {
        let transport = Self::new();
        transport
            .replies
            .try_lock()
            .expect("fresh transport")
            .push_back(Reply::Respond(status, body.to_string()));
        transport
    }

    pub(crate) fn responding_raw(status: u16, body: &str) -> Self {
        let transport = Self::new();
        transport
            .replies
            .try_lock()
            .expect("fresh transport")
            .push_back(Reply::Respond(status, body.to_string()));
        transport
    }

    pub(crate) fn failing(err: TransportError) -> Self {
        let transport = Self::new();
        transport
            .replies
            .try_lock()
            .expect("fresh transport")
            .push_back(Reply::Fail(err));
        transport
    }

    /// Holds every reply until the returned handle is notified.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) async fn push(&self, status: u16, body: Value) {
        self.replies
            .lock()
            .await
            .push_back(Reply::Respond(status, body.to_string()));
    }

    pub(crate) async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub(crate) async fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().await.push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.replies.lock().await.pop_front() {
            Some(Reply::Respond(status, body)) => Ok(ApiResponse::new(status, body)),
            Some(Reply::Fail(err)) => Err(err),
            None => Err(TransportError::Unreachable("no reply queued".to_string())),
        }
    }
}

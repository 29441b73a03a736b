use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::warn;

use crate::{
    domain::errors::{StoreError, StoreResult},
    ports::{
        credentials::CredentialStore,
        transport::{AuthEvent, QueryParams, Transport, TransportBody},
    },
};

const AUTH_EVENT_CAPACITY: usize = 16;

/// In-memory implementation of the transport port for testing and
/// development.
///
/// Responses are scripted per path; every request is counted so tests can
/// assert that cache hits avoid the network. Stubbing an `Unauthorized`
/// error reproduces the real adapter's 401 side effects (credential clear
/// plus broadcast).
pub struct InMemoryTransport {
    routes: RwLock<HashMap<String, StoreResult<TransportBody>>>,
    delays: RwLock<HashMap<String, Duration>>,
    counts: RwLock<HashMap<String, usize>>,
    credentials: RwLock<Option<Arc<dyn CredentialStore>>>,
    auth_tx: broadcast::Sender<AuthEvent>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        let (auth_tx, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self {
            routes: RwLock::new(HashMap::new()),
            delays: RwLock::new(HashMap::new()),
            counts: RwLock::new(HashMap::new()),
            credentials: RwLock::new(None),
            auth_tx,
        }
    }

    /// Wire a credential store so stubbed 401s clear it like the real
    /// adapter would.
    pub async fn attach_credentials(&self, credentials: Arc<dyn CredentialStore>) {
        *self.credentials.write().await = Some(credentials);
    }

    /// Script a successful JSON response for a path.
    pub async fn stub_json(&self, path: &str, body: Value) {
        self.routes
            .write()
            .await
            .insert(path.to_string(), Ok(TransportBody::Json(body)));
    }

    /// Script a failure for a path.
    pub async fn stub_error(&self, path: &str, error: StoreError) {
        self.routes
            .write()
            .await
            .insert(path.to_string(), Err(error));
    }

    /// Hold a path's response for `delay` before answering, so tests can
    /// interleave other store operations with an in-flight request.
    pub async fn stub_delay(&self, path: &str, delay: Duration) {
        self.delays.write().await.insert(path.to_string(), delay);
    }

    /// How many requests have hit a path.
    pub async fn request_count(&self, path: &str) -> usize {
        self.counts.read().await.get(path).copied().unwrap_or(0)
    }

    /// Total requests across every path.
    pub async fn total_requests(&self) -> usize {
        self.counts.read().await.values().sum()
    }

    async fn dispatch(&self, path: &str) -> StoreResult<TransportBody> {
        *self
            .counts
            .write()
            .await
            .entry(path.to_string())
            .or_insert(0) += 1;

        let delay = self.delays.read().await.get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.routes.read().await.get(path).cloned();
        let result = scripted.unwrap_or(Err(StoreError::HttpStatus {
            status: 404,
            message: "Unspecified error".to_string(),
        }));

        if matches!(result, Err(StoreError::Unauthorized)) {
            if let Some(credentials) = self.credentials.read().await.clone() {
                if let Err(error) = credentials.clear().await {
                    warn!(%error, "credential clear after stubbed 401 failed");
                }
            }
            let _ = self.auth_tx.send(AuthEvent::Unauthorized);
        }
        result
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn get(&self, _params: Option<&QueryParams>, path: &str) -> StoreResult<TransportBody> {
        self.dispatch(path).await
    }

    async fn post(
        &self,
        _body: Option<&Value>,
        path: &str,
        _alt_domain: Option<&str>,
    ) -> StoreResult<TransportBody> {
        self.dispatch(path).await
    }

    async fn put(&self, _body: Option<&Value>, path: &str) -> StoreResult<TransportBody> {
        self.dispatch(path).await
    }

    async fn delete(&self, path: &str) -> StoreResult<TransportBody> {
        self.dispatch(path).await
    }

    fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.auth_tx.subscribe()
    }
}

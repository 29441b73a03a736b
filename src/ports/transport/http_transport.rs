use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::domain::errors::StoreResult;

/// Query parameters as key/value pairs.
pub type QueryParams = [(String, String)];

/// Successful transport response.
///
/// 200 responses carry a parsed JSON body; 201/202 are success without a
/// body parse and surface only their status.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportBody {
    Json(Value),
    Empty { status: u16 },
}

impl TransportBody {
    /// The JSON payload, if this response carried one.
    pub fn into_json(self) -> Option<Value> {
        match self {
            TransportBody::Json(value) => Some(value),
            TransportBody::Empty { .. } => None,
        }
    }
}

/// Cross-cutting authentication signals emitted by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// A 401 was observed; credentials have been cleared.
    Unauthorized,
}

/// Port for the HTTP transport collaborator.
///
/// Implementations own the response-parsing contract: 200 parses the body as
/// JSON (injecting a `cacheTime` field into `data` from a
/// `Cache-Control: max-age` header when present), 201/202 succeed without a
/// body, 401 clears credentials and broadcasts [`AuthEvent::Unauthorized`],
/// and any other non-2xx becomes `StoreError::HttpStatus` with a best-effort
/// message from the `{"errors":[{"detail":...}]}` envelope. Timeouts are the
/// implementation's policy; the core has none of its own.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, params: Option<&QueryParams>, path: &str) -> StoreResult<TransportBody>;

    async fn post(
        &self,
        body: Option<&Value>,
        path: &str,
        alt_domain: Option<&str>,
    ) -> StoreResult<TransportBody>;

    async fn put(&self, body: Option<&Value>, path: &str) -> StoreResult<TransportBody>;

    async fn delete(&self, path: &str) -> StoreResult<TransportBody>;

    /// Subscribe to authentication state changes (401 broadcasts).
    fn auth_events(&self) -> broadcast::Receiver<AuthEvent>;
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::{StoreError, StoreResult},
        models::UserCredentials,
    },
    ports::{
        credentials::{CredentialStore, USER_ACCOUNT},
        transport::{AuthEvent, QueryParams, Transport, TransportBody},
    },
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const AUTH_EVENT_CAPACITY: usize = 16;

/// `reqwest`-backed implementation of the transport port.
///
/// Owns the response-parsing contract: JSON on 200, bodyless success on
/// 201/202, credential-clear plus broadcast on 401, and error-envelope
/// extraction for everything else. A `Cache-Control: max-age` header is
/// injected into the body's `data` object(s) as a `cacheTime` field before
/// the body reaches the core.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    auth_tx: broadcast::Sender<AuthEvent>,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("content-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| StoreError::Transport {
                message: error.to_string(),
            })?;
        let (auth_tx, _) = broadcast::channel(AUTH_EVENT_CAPACITY);

        Ok(Self {
            client,
            base_url: base_url.into(),
            credentials,
            auth_tx,
        })
    }

    fn url(&self, domain: Option<&str>, path: &str) -> String {
        let base = domain.unwrap_or(&self.base_url);
        format!("{}/{}", base.trim_end_matches('/'), path)
    }

    /// Attach the stored user token as a bearer header, when one exists.
    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let record = match self.credentials.load(USER_ACCOUNT).await {
            Ok(Some(record)) => record,
            Ok(None) => return request,
            Err(error) => {
                warn!(%error, "credential lookup failed, sending unauthenticated");
                return request;
            }
        };
        match UserCredentials::decode(&record) {
            Ok(credentials) => request.bearer_auth(credentials.token),
            Err(error) => {
                warn!(%error, "stored credential record is unreadable");
                request
            }
        }
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> StoreResult<TransportBody> {
        let request = self.authorize(request).await;
        let response = request.send().await.map_err(|error| StoreError::Transport {
            message: error.to_string(),
        })?;
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> StoreResult<TransportBody> {
        let status = response.status().as_u16();
        let max_age = cache_control_max_age(response.headers());

        match status {
            200 => {
                let text = response.text().await.map_err(|error| StoreError::Transport {
                    message: error.to_string(),
                })?;
                let mut value: Value =
                    serde_json::from_str(&text).map_err(|error| StoreError::Decode {
                        message: error.to_string(),
                    })?;
                if let Some(secs) = max_age {
                    inject_cache_time(&mut value, secs);
                }
                Ok(TransportBody::Json(value))
            }
            201 | 202 => Ok(TransportBody::Empty { status }),
            401 => {
                if let Err(error) = self.credentials.clear().await {
                    warn!(%error, "credential clear after 401 failed");
                }
                // Nobody listening is fine; the clear already happened.
                let _ = self.auth_tx.send(AuthEvent::Unauthorized);
                debug!("401 received, credentials cleared");
                Err(StoreError::Unauthorized)
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .and_then(|text| serde_json::from_str::<Value>(&text).ok())
                    .and_then(|value| error_detail(&value))
                    .unwrap_or_else(|| "Unspecified error".to_string());
                Err(StoreError::HttpStatus { status, message })
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, params: Option<&QueryParams>, path: &str) -> StoreResult<TransportBody> {
        let mut request = self.client.get(self.url(None, path));
        if let Some(params) = params {
            request = request.query(params);
        }
        self.execute(request).await
    }

    async fn post(
        &self,
        body: Option<&Value>,
        path: &str,
        alt_domain: Option<&str>,
    ) -> StoreResult<TransportBody> {
        let mut request = self.client.post(self.url(alt_domain, path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    async fn put(&self, body: Option<&Value>, path: &str) -> StoreResult<TransportBody> {
        let mut request = self.client.put(self.url(None, path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await
    }

    async fn delete(&self, path: &str) -> StoreResult<TransportBody> {
        self.execute(self.client.delete(self.url(None, path))).await
    }

    fn auth_events(&self) -> broadcast::Receiver<AuthEvent> {
        self.auth_tx.subscribe()
    }
}

/// Extract `max-age` seconds from a `Cache-Control` header, if present.
fn cache_control_max_age(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let header = headers
        .get(reqwest::header::CACHE_CONTROL)?
        .to_str()
        .ok()?;
    header.split(',').find_map(|directive| {
        directive
            .trim()
            .strip_prefix("max-age=")
            .and_then(|secs| secs.parse().ok())
    })
}

/// Write `cacheTime` into the document's `data` object, or into every
/// element when `data` is an array.
fn inject_cache_time(value: &mut Value, secs: u64) {
    match value.get_mut("data") {
        Some(Value::Object(data)) => {
            data.insert("cacheTime".to_string(), Value::from(secs));
        }
        Some(Value::Array(items)) => {
            for item in items {
                if let Value::Object(data) = item {
                    data.insert("cacheTime".to_string(), Value::from(secs));
                }
            }
        }
        _ => {}
    }
}

/// Best-effort message from a `{"errors":[{"detail":...}]}` envelope.
fn error_detail(value: &Value) -> Option<String> {
    value
        .get("errors")?
        .as_array()?
        .first()?
        .get("detail")?
        .as_str()
        .map(str::to_string)
}

use std::sync::Arc;

use crate::{
    adapters::outbound::{
        clock::{ManualClock, SystemClock},
        credentials::InMemoryCredentialStore,
        transport::{HttpTransport, InMemoryTransport},
    },
    ports::{clock::Clock, credentials::CredentialStore, transport::Transport},
    services::ContentStoreImpl,
};

const DEFAULT_SERVICE: &str = "content-store";

/// Transport backend configuration
#[derive(Debug, Clone)]
pub enum TransportBackend {
    InMemory,
    Http { base_url: String },
}

/// Store builder for dependency injection
pub struct StoreBuilder {
    transport_backend: TransportBackend,
    service_name: String,
    caching_enabled: bool,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            transport_backend: TransportBackend::InMemory,
            service_name: DEFAULT_SERVICE.to_string(),
            caching_enabled: true,
        }
    }

    /// Configure the transport backend
    pub fn with_transport_backend(mut self, backend: TransportBackend) -> Self {
        self.transport_backend = backend;
        self
    }

    /// Configure the credential namespace (normally the application name)
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Enable or disable TTL cache hits
    pub fn with_caching_enabled(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    /// Build the store with its collaborators wired in
    pub fn build(self) -> Result<ContentStoreImpl, BuildError> {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(InMemoryCredentialStore::new(self.service_name.clone()));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let transport: Arc<dyn Transport> = match self.transport_backend {
            TransportBackend::InMemory => Arc::new(InMemoryTransport::new()),
            TransportBackend::Http { base_url } => Arc::new(
                HttpTransport::new(base_url, credentials.clone()).map_err(|error| {
                    BuildError::TransportInit {
                        message: error.to_string(),
                    }
                })?,
            ),
        };

        Ok(ContentStoreImpl::new(transport, credentials, clock)
            .with_caching_enabled(self.caching_enabled))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder-level errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Transport initialization error: {message}")]
    TransportInit { message: String },
}

/// Handles to the in-memory collaborators backing a test store, so tests can
/// script responses, advance time and inspect credentials.
pub struct InMemoryDependencies {
    pub transport: Arc<InMemoryTransport>,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub clock: Arc<ManualClock>,
}

/// Create a store wired entirely to in-memory collaborators, returning the
/// collaborator handles alongside it. This is the fixture integration tests
/// build on.
pub async fn create_in_memory_store() -> (ContentStoreImpl, InMemoryDependencies) {
    let transport = Arc::new(InMemoryTransport::new());
    let credentials = Arc::new(InMemoryCredentialStore::new(DEFAULT_SERVICE));
    let clock = Arc::new(ManualClock::starting_now());

    transport
        .attach_credentials(credentials.clone() as Arc<dyn CredentialStore>)
        .await;

    let store = ContentStoreImpl::new(
        transport.clone() as Arc<dyn Transport>,
        credentials.clone() as Arc<dyn CredentialStore>,
        clock.clone() as Arc<dyn Clock>,
    );

    (
        store,
        InMemoryDependencies {
            transport,
            credentials,
            clock,
        },
    )
}

/// Create a store backed by a real HTTP transport against `base_url`.
pub fn create_http_store(base_url: impl Into<String>) -> Result<ContentStoreImpl, BuildError> {
    StoreBuilder::new()
        .with_transport_backend(TransportBackend::Http {
            base_url: base_url.into(),
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::services::ContentStore;

    #[tokio::test]
    async fn test_create_in_memory_store() {
        let (store, deps) = create_in_memory_store().await;
        assert_eq!(store.cached_len().await, 0);
        assert_eq!(deps.transport.total_requests().await, 0);
    }

    #[tokio::test]
    async fn test_builder_defaults() {
        let store = StoreBuilder::new().build().unwrap();
        assert_eq!(store.cached_len().await, 0);
    }

    #[test]
    fn test_http_store_builds() {
        assert!(create_http_store("https://api.example.com/v1").is_ok());
    }
}

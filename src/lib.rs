//! Content-store synchronization and caching engine.
//!
//! Resolves typed, relationally-linked media entities from a remote JSON
//! API, deduplicates and caches them in memory with TTL expiry, resolves
//! nested and side-loaded relationships, and fans concurrent fetches for the
//! same logical objects out and back in with partial-failure semantics.
//!
//! The crate is laid out hexagonally: `domain` holds the entity model,
//! `ports` the collaborator traits (transport, credentials, clock, the store
//! service itself), `services` the store engine, and `adapters` the
//! `reqwest`-backed and in-memory collaborator implementations.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - entities, value objects, errors
pub use domain::{
    AdsConfig, MediaDetails, MediaKind, MediaObject, MetricsConfig, RelationshipNode,
    RelationshipReference, ResolveOutcome, StoreConfig, StoreError, StoreResult, UserCredentials,
    ViewIds,
};

// Port types - interfaces for external systems
pub use ports::{
    AuthEvent, BatchOutcome, Clock, ContentStore, CredentialStore, SearchOutcome, Transport,
    TransportBody, USER_ACCOUNT,
};

// Service implementation - the store engine
pub use services::ContentStoreImpl;

// Application factory and configuration
pub use app::{
    BuildError, InMemoryDependencies, StoreBuilder, TransportBackend, create_http_store,
    create_in_memory_store,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    clock::{ManualClock, SystemClock},
    credentials::InMemoryCredentialStore,
    transport::{HttpTransport, InMemoryTransport},
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        ContentStore, ContentStoreImpl, MediaKind, MediaObject, RelationshipNode, StoreBuilder,
        StoreError, TransportBackend, create_http_store, create_in_memory_store,
    };
}

use async_trait::async_trait;

use crate::domain::{
    errors::{StoreError, StoreResult},
    models::{MediaObject, StoreConfig},
    value_objects::MediaKind,
};

/// Result of a batched object resolution.
///
/// Partial failure is first-class: `objects` holds everything that resolved
/// (from cache or network) while `errors` holds every per-id failure. Order
/// of `objects` is unspecified; only relationship resolution orders.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub objects: Vec<MediaObject>,
    pub errors: Vec<StoreError>,
}

impl BatchOutcome {
    /// Whether every requested id resolved without error.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of a search: typed sub-lists of the heterogeneous response.
/// Entities of other kinds are cached but not listed here.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub videos: Vec<MediaObject>,
    pub collections: Vec<MediaObject>,
    pub errors: Vec<StoreError>,
}

/// Port for the content store service.
///
/// The store owns the in-memory object cache and orchestrates
/// fetch-or-use-cached decisions, TTL expiry, concurrent fan-out/fan-in and
/// config bootstrap against the transport collaborator.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Fetch the server config, replace the store's snapshot wholesale and
    /// persist any embedded user auth token.
    async fn initialize(&self) -> StoreResult<()>;

    /// Resolve objects of one kind by id, serving non-expired cache entries
    /// and fetching the rest concurrently. `include` is forwarded to the API
    /// as the `include` query parameter for side-loading.
    async fn objects_of_type(
        &self,
        kind: MediaKind,
        ids: &[String],
        include: Option<&str>,
    ) -> BatchOutcome;

    /// Resolve a single object of one kind.
    async fn object_of_type(
        &self,
        kind: MediaKind,
        id: &str,
        include: Option<&str>,
    ) -> StoreResult<MediaObject>;

    /// Run a search; every decodable result is inserted into the cache.
    async fn search(&self, term: &str) -> SearchOutcome;

    /// Clear cache and config. Idempotent; in-flight fetches are not
    /// cancelled but their completions are discarded.
    async fn reset(&self);

    /// The current config snapshot, if `initialize` has succeeded.
    async fn config(&self) -> Option<StoreConfig>;

    /// Number of objects currently cached.
    async fn cached_len(&self) -> usize;
}

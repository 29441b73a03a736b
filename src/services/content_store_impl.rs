use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    domain::{
        errors::{StoreError, StoreResult},
        models::{MediaObject, ResourceDocument, StoreConfig, UserCredentials},
        value_objects::MediaKind,
    },
    ports::{
        clock::Clock,
        credentials::{CredentialStore, USER_ACCOUNT},
        services::{BatchOutcome, ContentStore, SearchOutcome},
        transport::Transport,
    },
};

/// Implementation of the content store engine.
///
/// Owns the in-memory object cache and the config snapshot behind one
/// `RwLock`; that lock is the mutual-exclusion guard around the
/// check-cache / fetch / insert cycle, so concurrent resolution calls and
/// parallel fetch completions never race on shared state.
pub struct ContentStoreImpl {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    caching_enabled: bool,
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    /// Cache keyed by object id. The id space is shared across kinds, which
    /// is what makes the type-mismatch check possible.
    cache: HashMap<String, MediaObject>,
    config: Option<StoreConfig>,
    /// Bumped on every reset. Fetches started under an older generation have
    /// their completions discarded instead of repopulating the fresh cache.
    generation: u64,
}

/// Outcome of the cache-matching phase for one batch request.
struct CachePartition {
    hits: Vec<MediaObject>,
    errors: Vec<StoreError>,
    misses: Vec<String>,
    generation: u64,
}

impl ContentStoreImpl {
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            credentials,
            clock,
            caching_enabled: true,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Disable TTL cache hits: every request goes to the network. Type
    /// mismatches are still detected against whatever the cache holds.
    pub fn with_caching_enabled(mut self, enabled: bool) -> Self {
        self.caching_enabled = enabled;
        self
    }

    /// Phase one of resolution: match requested ids against the cache.
    async fn partition(&self, kind: MediaKind, ids: &[String]) -> CachePartition {
        let now = self.clock.now();
        let state = self.state.read().await;

        let mut partition = CachePartition {
            hits: Vec::new(),
            errors: Vec::new(),
            misses: Vec::new(),
            generation: state.generation,
        };

        // Cold start: nothing can match, skip the scan entirely.
        if state.cache.is_empty() {
            partition.misses = dedup_preserving_order(ids);
            return partition;
        }

        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            match state.cache.get(id) {
                Some(cached) if cached.kind != kind => {
                    // Wrong kind under this id: surfaced as an error and the
                    // id counts as resolved, no refetch.
                    partition.errors.push(StoreError::TypeMismatch {
                        id: id.clone(),
                        requested: kind,
                        found: cached.kind,
                    });
                }
                Some(cached) if self.caching_enabled && !cached.has_expired(now) => {
                    partition.hits.push(cached.clone());
                }
                _ => partition.misses.push(id.clone()),
            }
        }
        partition
    }

    /// Fetch one object, decode it and insert it (plus any side-loaded
    /// entities) into the cache. Returns `Ok(None)` when the store was reset
    /// while the fetch was in flight and the completion was discarded.
    async fn fetch_and_cache(
        &self,
        kind: MediaKind,
        id: &str,
        include: Option<&str>,
        generation: u64,
    ) -> StoreResult<Option<MediaObject>> {
        let path = format!("{}/{}", kind.path_segment(), id);
        let params = include.map(|value| vec![("include".to_string(), value.to_string())]);

        let body = self.transport.get(params.as_deref(), &path).await?;
        let value = body.into_json().ok_or_else(|| StoreError::Decode {
            message: format!("empty response body for {}", path),
        })?;
        let document = ResourceDocument::from_value(value).ok_or_else(|| StoreError::Decode {
            message: format!("malformed response document for {}", path),
        })?;
        let resource = document.primary().ok_or_else(|| StoreError::Decode {
            message: format!("response for {} carries no primary data", path),
        })?;

        let now = self.clock.now();
        let object = MediaObject::from_resource(resource, None, now);
        let Some(object_id) = object.id.clone() else {
            return Err(StoreError::MissingIdentity { kind: object.kind });
        };

        // Side-loaded entities inherit the primary object's TTL.
        let ttl_hint = object.cache_time;
        let included: Vec<MediaObject> = document
            .included
            .iter()
            .map(|res| MediaObject::from_resource(res, ttl_hint, now))
            .collect();

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(%path, "discarding completion from a previous store generation");
            return Ok(None);
        }
        for entity in included {
            match entity.id.clone() {
                Some(entity_id) => {
                    state.cache.insert(entity_id, entity);
                }
                None => warn!(%path, "skipping included entity without an id"),
            }
        }
        state.cache.insert(object_id, object.clone());
        Ok(Some(object))
    }
}

#[async_trait]
impl ContentStore for ContentStoreImpl {
    async fn initialize(&self) -> StoreResult<()> {
        let generation = self.state.read().await.generation;
        let body = self.transport.get(None, "config").await?;
        let value = body.into_json().ok_or_else(|| StoreError::Decode {
            message: "config response carries no body".to_string(),
        })?;
        let document = ResourceDocument::from_value(value).ok_or_else(|| StoreError::Decode {
            message: "malformed config document".to_string(),
        })?;
        let resource = document.primary().ok_or_else(|| StoreError::Decode {
            message: "config document carries no primary data".to_string(),
        })?;

        // Build the full snapshot before touching shared state so callers
        // only ever observe the old config or the complete new one.
        let config = StoreConfig::from_resource(resource);

        {
            let mut state = self.state.write().await;
            if state.generation != generation {
                debug!("discarding config from a previous store generation");
                return Ok(());
            }
            state.config = Some(config);
        }

        if let Some(token) = resource.str_attr("token") {
            let record = UserCredentials::new(USER_ACCOUNT, token).encode()?;
            self.credentials.store(USER_ACCOUNT, &record).await?;
            debug!("persisted embedded user auth token");
        }
        Ok(())
    }

    async fn objects_of_type(
        &self,
        kind: MediaKind,
        ids: &[String],
        include: Option<&str>,
    ) -> BatchOutcome {
        if !kind.is_fetchable() {
            return BatchOutcome {
                objects: Vec::new(),
                errors: vec![StoreError::Unfetchable { kind }],
            };
        }

        let partition = self.partition(kind, ids).await;
        debug!(
            kind = %kind,
            hits = partition.hits.len(),
            misses = partition.misses.len(),
            "resolving object batch"
        );

        let mut outcome = BatchOutcome {
            objects: partition.hits,
            errors: partition.errors,
        };

        let fetches = partition
            .misses
            .iter()
            .map(|id| self.fetch_and_cache(kind, id, include, partition.generation));

        // join_all is the fan-in point: the aggregate outcome is produced
        // exactly once, after every sibling fetch has completed.
        for result in join_all(fetches).await {
            match result {
                Ok(Some(object)) => outcome.objects.push(object),
                Ok(None) => {}
                Err(error) => outcome.errors.push(error),
            }
        }
        outcome
    }

    async fn object_of_type(
        &self,
        kind: MediaKind,
        id: &str,
        include: Option<&str>,
    ) -> StoreResult<MediaObject> {
        let ids = [id.to_string()];
        let mut outcome = self.objects_of_type(kind, &ids, include).await;
        match outcome.objects.pop() {
            Some(object) => Ok(object),
            None => Err(outcome
                .errors
                .pop()
                .unwrap_or_else(|| StoreError::Decode {
                    message: format!("object {} was not returned", id),
                })),
        }
    }

    async fn search(&self, term: &str) -> SearchOutcome {
        let generation = self.state.read().await.generation;
        let params = [("filter[query]".to_string(), term.to_string())];
        let body = match self.transport.get(Some(&params), "search").await {
            Ok(body) => body,
            Err(error) => {
                return SearchOutcome {
                    errors: vec![error],
                    ..SearchOutcome::default()
                }
            }
        };

        let document = body
            .into_json()
            .and_then(|value| ResourceDocument::from_value(value));
        let Some(document) = document else {
            return SearchOutcome {
                errors: vec![StoreError::Decode {
                    message: "malformed search response".to_string(),
                }],
                ..SearchOutcome::default()
            };
        };

        let now = self.clock.now();
        let mut outcome = SearchOutcome::default();
        let mut decoded = Vec::new();
        for resource in document.primary_list() {
            let object = MediaObject::from_resource(resource, None, now);
            if object.id.is_none() {
                outcome
                    .errors
                    .push(StoreError::MissingIdentity { kind: object.kind });
                continue;
            }
            decoded.push(object);
        }

        {
            let mut state = self.state.write().await;
            if state.generation == generation {
                for object in &decoded {
                    if let Some(id) = object.id.clone() {
                        state.cache.insert(id, object.clone());
                    }
                }
            } else {
                debug!("search completed under a previous store generation, not caching");
            }
        }

        for object in decoded {
            match object.kind {
                MediaKind::Video => outcome.videos.push(object),
                MediaKind::Collection => outcome.collections.push(object),
                // Other kinds (including Unknown) stay cached but unlisted.
                _ => {}
            }
        }
        outcome
    }

    async fn reset(&self) {
        let mut state = self.state.write().await;
        state.cache.clear();
        state.config = None;
        state.generation += 1;
        debug!(generation = state.generation, "store reset");
    }

    async fn config(&self) -> Option<StoreConfig> {
        self.state.read().await.config.clone()
    }

    async fn cached_len(&self) -> usize {
        self.state.read().await.cache.len()
    }
}

fn dedup_preserving_order(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

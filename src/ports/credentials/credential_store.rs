use async_trait::async_trait;

use crate::domain::errors::StoreResult;

/// Account name under which the authenticated user's record is kept.
pub const USER_ACCOUNT: &str = "user";

/// Port for the secure credential store collaborator.
///
/// Records are opaque byte strings (see `UserCredentials` for the layout the
/// store writes), keyed by account name within a service namespace derived
/// from the host application's name. Only the authentication subsystem uses
/// this port; cached media objects are never persisted through it.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// The service namespace this store is scoped to.
    fn service(&self) -> &str;

    async fn load(&self, account: &str) -> StoreResult<Option<Vec<u8>>>;

    async fn store(&self, account: &str, record: &[u8]) -> StoreResult<()>;

    async fn remove(&self, account: &str) -> StoreResult<()>;

    /// Remove every record in the namespace. Invoked by the transport layer
    /// when a 401 is observed.
    async fn clear(&self) -> StoreResult<()>;
}

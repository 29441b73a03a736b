pub mod clock;
pub mod credentials;
pub mod services;
pub mod transport;

// Re-export all port traits for convenience
pub use clock::Clock;
pub use credentials::{CredentialStore, USER_ACCOUNT};
pub use services::{BatchOutcome, ContentStore, SearchOutcome};
pub use transport::{AuthEvent, QueryParams, Transport, TransportBody};

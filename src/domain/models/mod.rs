pub mod config;
pub mod credentials;
pub mod media_object;
pub mod relationship;
pub mod wire;

pub use config::{AdsConfig, MetricsConfig, StoreConfig, ViewIds};
pub use credentials::UserCredentials;
pub use media_object::{MediaDetails, MediaObject};
pub use relationship::{RelationshipNode, ResolveOutcome};
pub use wire::{
    PrimaryData, RelationshipData, RelationshipObject, Resource, ResourceDocument,
    ResourceIdentifier, ResourceLinks,
};

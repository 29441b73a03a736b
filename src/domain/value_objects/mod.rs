mod media_kind;
mod relationship_ref;

pub use media_kind::MediaKind;
pub use relationship_ref::RelationshipReference;

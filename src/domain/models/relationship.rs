use std::collections::HashMap;

use futures::future::join_all;

use crate::domain::errors::StoreError;
use crate::domain::models::media_object::MediaObject;
use crate::domain::models::wire::RelationshipData;
use crate::domain::value_objects::{MediaKind, RelationshipReference};
use crate::ports::services::ContentStore;

/// A named relationship from one media object to others.
///
/// Exactly one shape at a time: either a single reference or an ordered list
/// of them. The order of `Multiple` is the wire order and is the order
/// callers get back from [`RelationshipNode::resolve_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipNode {
    Single(RelationshipReference),
    Multiple(Vec<RelationshipReference>),
}

/// Merged result of resolving a relationship: objects in original reference
/// order plus the errors accumulated across kind partitions.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    pub objects: Vec<MediaObject>,
    pub errors: Vec<StoreError>,
}

impl RelationshipNode {
    /// Build a node from wire relationship linkage. Identifiers without an
    /// id are dropped; a `Single` whose identifier is unusable yields `None`.
    pub fn from_wire(data: &RelationshipData) -> Option<Self> {
        match data {
            RelationshipData::One(identifier) => {
                identifier.to_reference().map(RelationshipNode::Single)
            }
            RelationshipData::Many(identifiers) => Some(RelationshipNode::Multiple(
                identifiers
                    .iter()
                    .filter_map(|identifier| identifier.to_reference())
                    .collect(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RelationshipNode::Single(_) => 1,
            RelationshipNode::Multiple(refs) => refs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The references in order.
    pub fn references(&self) -> &[RelationshipReference] {
        match self {
            RelationshipNode::Single(reference) => std::slice::from_ref(reference),
            RelationshipNode::Multiple(refs) => refs,
        }
    }

    /// All referenced ids, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.references().iter().map(|r| r.id.as_str()).collect()
    }

    /// Referenced ids restricted to one kind, in order.
    pub fn ids_of_kind(&self, kind: MediaKind) -> Vec<&str> {
        self.references()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.id.as_str())
            .collect()
    }

    /// The distinct kinds present among the references.
    pub fn kinds(&self) -> Vec<MediaKind> {
        let mut kinds: Vec<MediaKind> = self.references().iter().map(|r| r.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// Resolve every reference through the store.
    ///
    /// Fans out one `objects_of_type` call per distinct kind present and
    /// fans in once every kind partition has completed. The merged objects
    /// are reordered to match the original reference order (callers rely on
    /// relationship order surviving resolution, whatever the completion
    /// order of the underlying fetches). References whose kind has no API
    /// endpoint are reported as errors instead of fetched; a failing
    /// partition contributes its errors without halting the others.
    pub async fn resolve_all(&self, store: &dyn ContentStore) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::default();

        let mut fetchable_kinds = Vec::new();
        for kind in self.kinds() {
            if kind.is_fetchable() {
                fetchable_kinds.push(kind);
            } else {
                outcome
                    .errors
                    .push(StoreError::Unfetchable { kind });
            }
        }

        let partitions = fetchable_kinds.into_iter().map(|kind| {
            let ids: Vec<String> = self
                .ids_of_kind(kind)
                .into_iter()
                .map(str::to_string)
                .collect();
            async move { store.objects_of_type(kind, &ids, None).await }
        });

        let mut resolved = Vec::new();
        for batch in join_all(partitions).await {
            resolved.extend(batch.objects);
            outcome.errors.extend(batch.errors);
        }

        // Stable reorder by first occurrence of each id in the reference list.
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (index, reference) in self.references().iter().enumerate() {
            positions.entry(reference.id.as_str()).or_insert(index);
        }
        resolved.sort_by_key(|object| {
            object
                .id
                .as_deref()
                .and_then(|id| positions.get(id).copied())
                .unwrap_or(usize::MAX)
        });

        outcome.objects = resolved;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::wire::ResourceIdentifier;

    fn reference(id: &str, kind: MediaKind) -> RelationshipReference {
        RelationshipReference::new(id, kind)
    }

    #[test]
    fn test_single_node_views() {
        let node = RelationshipNode::Single(reference("a", MediaKind::Video));
        assert_eq!(node.len(), 1);
        assert_eq!(node.ids(), vec!["a"]);
        assert_eq!(node.kinds(), vec![MediaKind::Video]);
        assert!(node.ids_of_kind(MediaKind::Article).is_empty());
    }

    #[test]
    fn test_multiple_node_views() {
        let node = RelationshipNode::Multiple(vec![
            reference("c", MediaKind::Collection),
            reference("a", MediaKind::Video),
            reference("b", MediaKind::Video),
        ]);
        assert_eq!(node.len(), 3);
        assert_eq!(node.ids(), vec!["c", "a", "b"]);
        assert_eq!(node.ids_of_kind(MediaKind::Video), vec!["a", "b"]);
        assert_eq!(node.kinds(), vec![MediaKind::Video, MediaKind::Collection]);
    }

    #[test]
    fn test_from_wire_drops_idless_identifiers() {
        let data = RelationshipData::Many(vec![
            ResourceIdentifier {
                id: Some("x".to_string()),
                type_tag: Some("video".to_string()),
            },
            ResourceIdentifier {
                id: None,
                type_tag: Some("video".to_string()),
            },
        ]);
        let node = RelationshipNode::from_wire(&data).unwrap();
        assert_eq!(node.ids(), vec!["x"]);

        let single = RelationshipData::One(ResourceIdentifier::default());
        assert!(RelationshipNode::from_wire(&single).is_none());
    }
}

use crate::domain::value_objects::MediaKind;

/// A by-id reference from one media object to another.
///
/// References are weak: holders re-resolve them through the content store
/// rather than keeping the referenced object alive themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipReference {
    pub id: String,
    pub kind: MediaKind,
}

impl RelationshipReference {
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

impl std::fmt::Display for RelationshipReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_covers_both_fields() {
        let a = RelationshipReference::new("42", MediaKind::Video);
        let b = RelationshipReference::new("42", MediaKind::Collection);
        let c = RelationshipReference::new("42", MediaKind::Video);

        assert_ne!(a, b);
        assert_eq!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}

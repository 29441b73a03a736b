/// The closed set of media entity kinds the store understands.
///
/// Wire payloads carry a lowercase type tag (`"video"`, `"collection"`, ...).
/// Tags outside the known set decode to `Unknown` so that side-loaded
/// entities of a newer server version are kept rather than dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaKind {
    Video,
    Collection,
    Promotion,
    Article,
    Event,
    External,
    View,
    Unknown,
}

impl MediaKind {
    /// Parse a wire type tag into a kind. Unrecognized tags map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "video" => MediaKind::Video,
            "collection" => MediaKind::Collection,
            "promotion" => MediaKind::Promotion,
            "article" => MediaKind::Article,
            "event" => MediaKind::Event,
            "external" => MediaKind::External,
            "view" => MediaKind::View,
            _ => MediaKind::Unknown,
        }
    }

    /// The wire type tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Collection => "collection",
            MediaKind::Promotion => "promotion",
            MediaKind::Article => "article",
            MediaKind::Event => "event",
            MediaKind::External => "external",
            MediaKind::View => "view",
            MediaKind::Unknown => "unknown",
        }
    }

    /// The REST collection segment used when fetching objects of this kind,
    /// e.g. `videos` for `GET videos/{id}`.
    pub fn path_segment(&self) -> String {
        format!("{}s", self.tag())
    }

    /// Whether objects of this kind can be fetched individually from the API.
    /// `Unknown` has no collection endpoint.
    pub fn is_fetchable(&self) -> bool {
        !matches!(self, MediaKind::Unknown)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for kind in [
            MediaKind::Video,
            MediaKind::Collection,
            MediaKind::Promotion,
            MediaKind::Article,
            MediaKind::Event,
            MediaKind::External,
            MediaKind::View,
        ] {
            assert_eq!(MediaKind::from_tag(kind.tag()), kind);
        }
    }

    #[test]
    fn test_unrecognized_tag_is_unknown() {
        assert_eq!(MediaKind::from_tag("podcast"), MediaKind::Unknown);
        assert_eq!(MediaKind::from_tag(""), MediaKind::Unknown);
        assert!(!MediaKind::Unknown.is_fetchable());
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(MediaKind::Video.path_segment(), "videos");
        assert_eq!(MediaKind::Collection.path_segment(), "collections");
    }
}

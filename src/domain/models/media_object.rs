use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::models::relationship::RelationshipNode;
use crate::domain::models::wire::Resource;
use crate::domain::value_objects::{MediaKind, RelationshipReference};

/// A typed media entity held by the content store.
///
/// Objects are constructed from wire resources via [`MediaObject::from_resource`]
/// and live in the store's cache until an explicit reset. Staleness
/// ([`MediaObject::has_expired`]) only signals that a refetch is due; it never
/// deletes the object.
#[derive(Debug, Clone)]
pub struct MediaObject {
    pub id: Option<String>,
    pub kind: MediaKind,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub release_date: Option<DateTime<Utc>>,
    /// Opaque customer-extension payload, passed through undecoded.
    pub meta: HashMap<String, Value>,
    /// TTL in effect for this object; `None` means it never expires.
    pub cache_time: Option<Duration>,
    /// Instant of the last successful population from the API.
    pub last_update: SystemTime,
    /// Named relationships to other objects, resolved lazily by id.
    pub relationships: HashMap<String, RelationshipNode>,
    pub details: MediaDetails,
}

/// Kind-specific payload, a closed sum over the known entity kinds.
///
/// Each variant has its own decode path selected by the wire type tag;
/// resources with an unrecognized tag carry no payload.
#[derive(Debug, Clone, Default)]
pub enum MediaDetails {
    Video {
        player_url: Option<String>,
        stream_format: Option<String>,
    },
    Collection {
        /// Child references in wire order.
        children: Vec<RelationshipReference>,
    },
    Promotion {
        action_url: Option<String>,
    },
    Article {
        body: Option<String>,
    },
    Event {
        location: Option<String>,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    },
    External {
        link: Option<String>,
    },
    View,
    #[default]
    None,
}

impl MediaObject {
    /// Build an object from a wire resource.
    ///
    /// Common attributes are populated first, then the kind-specific decode
    /// extends them. Missing or mistyped fields become `None`; decoding never
    /// fails outright. `ttl_hint` is the document-level cache time applied
    /// when the resource carries none of its own (side-loaded entities
    /// inherit the primary response's TTL this way).
    pub fn from_resource(resource: &Resource, ttl_hint: Option<Duration>, now: SystemTime) -> Self {
        let kind = resource.kind();
        let cache_time = resource
            .cache_time
            .map(Duration::from_secs)
            .or(ttl_hint);

        let meta = resource
            .object_attr("meta")
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let relationships = resource
            .relationships
            .iter()
            .filter_map(|(name, object)| {
                RelationshipNode::from_wire(object.data.as_ref()?)
                    .map(|node| (name.clone(), node))
            })
            .collect();

        MediaObject {
            id: resource.id.clone(),
            kind,
            title: resource.str_attr("title"),
            subtitle: resource.str_attr("subtitle"),
            notes: resource.str_attr("notes"),
            url: resource.str_attr("url"),
            thumbnail: resource.str_attr("thumbnail"),
            duration: resource.f64_attr("duration"),
            release_date: date_attr(resource, "releaseDate"),
            meta,
            cache_time,
            last_update: now,
            details: MediaDetails::decode(kind, resource),
            relationships,
        }
    }

    /// TTL invariant: expired iff a cache time is set and
    /// `now > last_update + cache_time`. Objects without a cache time never
    /// expire.
    pub fn has_expired(&self, now: SystemTime) -> bool {
        match self.cache_time {
            Some(ttl) => now > self.last_update + ttl,
            None => false,
        }
    }

    /// The collection's child references in wire order; empty for other kinds.
    pub fn children(&self) -> &[RelationshipReference] {
        match &self.details {
            MediaDetails::Collection { children } => children,
            _ => &[],
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// All child ids, in order.
    pub fn child_ids(&self) -> Vec<&str> {
        self.children().iter().map(|r| r.id.as_str()).collect()
    }

    /// Child ids restricted to one kind, in order.
    pub fn child_ids_of_kind(&self, kind: MediaKind) -> Vec<&str> {
        self.children()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.id.as_str())
            .collect()
    }

    /// The distinct kinds present among the children.
    pub fn child_kinds(&self) -> Vec<MediaKind> {
        let mut kinds: Vec<MediaKind> = self.children().iter().map(|r| r.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

impl MediaDetails {
    /// Select and run the decode path for one kind.
    fn decode(kind: MediaKind, resource: &Resource) -> Self {
        match kind {
            MediaKind::Video => Self::decode_video(resource),
            MediaKind::Collection => Self::decode_collection(resource),
            MediaKind::Promotion => Self::decode_promotion(resource),
            MediaKind::Article => Self::decode_article(resource),
            MediaKind::Event => Self::decode_event(resource),
            MediaKind::External => Self::decode_external(resource),
            MediaKind::View => MediaDetails::View,
            MediaKind::Unknown => MediaDetails::None,
        }
    }

    fn decode_video(resource: &Resource) -> Self {
        let player = resource.object_attr("player");
        MediaDetails::Video {
            player_url: player
                .and_then(|p| p.get("url"))
                .and_then(Value::as_str)
                .map(str::to_string),
            stream_format: player
                .and_then(|p| p.get("format"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    fn decode_collection(resource: &Resource) -> Self {
        // Children come from the `items` relationship, preserving wire order.
        let children = resource
            .relationships
            .get("items")
            .and_then(|object| object.data.as_ref())
            .map(|data| {
                RelationshipNode::from_wire(data)
                    .map(|node| node.references().to_vec())
                    .unwrap_or_default()
            })
            .unwrap_or_default();
        MediaDetails::Collection { children }
    }

    fn decode_promotion(resource: &Resource) -> Self {
        MediaDetails::Promotion {
            action_url: resource.str_attr("actionUrl"),
        }
    }

    fn decode_article(resource: &Resource) -> Self {
        MediaDetails::Article {
            body: resource.str_attr("body"),
        }
    }

    fn decode_event(resource: &Resource) -> Self {
        MediaDetails::Event {
            location: resource.str_attr("location"),
            starts_at: date_attr(resource, "startDate"),
            ends_at: date_attr(resource, "endDate"),
        }
    }

    fn decode_external(resource: &Resource) -> Self {
        MediaDetails::External {
            link: resource.str_attr("link"),
        }
    }
}

/// RFC 3339 date attribute; unparseable values decode to `None`.
fn date_attr(resource: &Resource, key: &str) -> Option<DateTime<Utc>> {
    resource
        .str_attr(key)
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::wire::ResourceDocument;
    use serde_json::json;

    fn resource(value: Value) -> Resource {
        let doc = ResourceDocument::from_value(json!({ "data": value })).unwrap();
        doc.primary().unwrap().clone()
    }

    #[test]
    fn test_common_attributes_decode() {
        let res = resource(json!({
            "id": "v1",
            "type": "video",
            "attributes": {
                "title": "Opening",
                "subtitle": "Part one",
                "duration": 95.0,
                "releaseDate": "2024-03-01T12:00:00Z",
                "meta": {"badge": "new"},
                "player": {"url": "https://cdn/v1.m3u8", "format": "hls"}
            }
        }));
        let obj = MediaObject::from_resource(&res, None, SystemTime::now());

        assert_eq!(obj.id.as_deref(), Some("v1"));
        assert_eq!(obj.kind, MediaKind::Video);
        assert_eq!(obj.title.as_deref(), Some("Opening"));
        assert_eq!(obj.duration, Some(95.0));
        assert!(obj.release_date.is_some());
        assert_eq!(obj.meta.get("badge"), Some(&json!("new")));
        match &obj.details {
            MediaDetails::Video {
                player_url,
                stream_format,
            } => {
                assert_eq!(player_url.as_deref(), Some("https://cdn/v1.m3u8"));
                assert_eq!(stream_format.as_deref(), Some("hls"));
            }
            other => panic!("expected video details, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_id_still_decodes() {
        let res = resource(json!({
            "type": "article",
            "attributes": {"body": "text"}
        }));
        let obj = MediaObject::from_resource(&res, None, SystemTime::now());
        assert!(obj.id.is_none());
        assert_eq!(obj.kind, MediaKind::Article);
    }

    #[test]
    fn test_ttl_hint_and_own_cache_time() {
        let now = SystemTime::now();

        let with_own = resource(json!({
            "id": "a", "type": "video", "cacheTime": 60, "attributes": {}
        }));
        let obj = MediaObject::from_resource(&with_own, Some(Duration::from_secs(5)), now);
        assert_eq!(obj.cache_time, Some(Duration::from_secs(60)));

        let without = resource(json!({"id": "b", "type": "video", "attributes": {}}));
        let obj = MediaObject::from_resource(&without, Some(Duration::from_secs(5)), now);
        assert_eq!(obj.cache_time, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_expiry_invariant() {
        let now = SystemTime::now();
        let res = resource(json!({
            "id": "a", "type": "video", "cacheTime": 30, "attributes": {}
        }));
        let obj = MediaObject::from_resource(&res, None, now);

        assert!(!obj.has_expired(now));
        assert!(!obj.has_expired(now + Duration::from_secs(30)));
        assert!(obj.has_expired(now + Duration::from_secs(31)));

        let eternal = resource(json!({"id": "b", "type": "video", "attributes": {}}));
        let obj = MediaObject::from_resource(&eternal, None, now);
        assert!(!obj.has_expired(now + Duration::from_secs(3600 * 24 * 365)));
    }

    #[test]
    fn test_collection_children_preserve_order() {
        let res = resource(json!({
            "id": "c1",
            "type": "collection",
            "attributes": {"title": "Season"},
            "relationships": {
                "items": {"data": [
                    {"id": "e3", "type": "video"},
                    {"id": "e1", "type": "video"},
                    {"id": "promo", "type": "promotion"}
                ]}
            }
        }));
        let obj = MediaObject::from_resource(&res, None, SystemTime::now());

        assert_eq!(obj.child_count(), 3);
        assert_eq!(obj.child_ids(), vec!["e3", "e1", "promo"]);
        assert_eq!(obj.child_ids_of_kind(MediaKind::Video), vec!["e3", "e1"]);
        assert_eq!(
            obj.child_kinds(),
            vec![MediaKind::Video, MediaKind::Promotion]
        );
    }

    #[test]
    fn test_unknown_kind_has_no_details() {
        let res = resource(json!({"id": "m1", "type": "mixtape", "attributes": {}}));
        let obj = MediaObject::from_resource(&res, None, SystemTime::now());
        assert_eq!(obj.kind, MediaKind::Unknown);
        assert!(matches!(obj.details, MediaDetails::None));
    }
}

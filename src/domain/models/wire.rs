use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::domain::value_objects::{MediaKind, RelationshipReference};

/// Deserialize a field, treating a mistyped value as absent.
///
/// Wire payloads are decoded defensively: a field of the wrong JSON type
/// degrades to its default instead of failing the enclosing document.
fn lenient<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: serde::de::DeserializeOwned + Default,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Decode the object elements of a JSON array, skipping anything else.
fn from_object_elements<T>(items: Vec<Value>) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    items
        .into_iter()
        .filter(|item| item.is_object())
        .filter_map(|item| T::deserialize(item).ok())
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Top-level JSON:API-flavored response document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<PrimaryData>,
    #[serde(default, deserialize_with = "lenient")]
    pub included: Vec<Resource>,
}

impl ResourceDocument {
    /// Decode a document from a raw JSON value. Only a non-object top level
    /// yields `None`; malformed inner fields degrade to their defaults.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// The single primary resource, if the document carries exactly one.
    pub fn primary(&self) -> Option<&Resource> {
        match &self.data {
            Some(PrimaryData::One(resource)) => Some(resource),
            _ => None,
        }
    }

    /// The primary resources as a slice, whether `data` was one or many.
    pub fn primary_list(&self) -> &[Resource] {
        match &self.data {
            Some(PrimaryData::One(resource)) => std::slice::from_ref(resource),
            Some(PrimaryData::Many(resources)) => resources,
            None => &[],
        }
    }
}

/// `data` may be a single resource object or an array of them.
#[derive(Debug, Clone)]
pub enum PrimaryData {
    One(Resource),
    Many(Vec<Resource>),
}

// Untagged inference cannot distinguish the shapes here: with every field
// defaulted, a struct also deserializes from a sequence, so a short array
// would match the single-object variant. Dispatch on the JSON shape instead.
impl<'de> Deserialize<'de> for PrimaryData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Array(items) => Ok(PrimaryData::Many(from_object_elements(items))),
            Value::Object(_) => Resource::deserialize(value)
                .map(PrimaryData::One)
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected resource object or array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// One resource object: `{id, type, attributes, relationships, links}`.
///
/// The transport layer may inject a `cacheTime` integer (seconds) derived
/// from the response's `Cache-Control: max-age` header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub type_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub attributes: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub relationships: HashMap<String, RelationshipObject>,
    #[serde(default, deserialize_with = "lenient")]
    pub links: Option<ResourceLinks>,
    #[serde(default, rename = "cacheTime", deserialize_with = "lenient")]
    pub cache_time: Option<u64>,
}

impl Resource {
    /// The kind this resource decodes to. A missing or unrecognized type
    /// tag yields `Unknown`.
    pub fn kind(&self) -> MediaKind {
        self.type_tag
            .as_deref()
            .map(MediaKind::from_tag)
            .unwrap_or(MediaKind::Unknown)
    }

    /// String attribute, `None` when absent or mistyped.
    pub fn str_attr(&self, key: &str) -> Option<String> {
        self.attributes
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Floating-point attribute, `None` when absent or mistyped.
    pub fn f64_attr(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(Value::as_f64)
    }

    /// Nested object attribute, `None` when absent or mistyped.
    pub fn object_attr(&self, key: &str) -> Option<&Map<String, Value>> {
        self.attributes.get(key).and_then(Value::as_object)
    }
}

/// `relationships.{name}` entry wrapping one or many resource identifiers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipObject {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<RelationshipData>,
}

/// Relationship linkage: a single `{id, type}` pair or an ordered list.
#[derive(Debug, Clone)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

// Same shape ambiguity as `PrimaryData`: dispatch on the JSON value kind.
impl<'de> Deserialize<'de> for RelationshipData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Array(items) => Ok(RelationshipData::Many(from_object_elements(items))),
            Value::Object(_) => ResourceIdentifier::deserialize(value)
                .map(RelationshipData::One)
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected identifier object or array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// A bare `{id, type}` pair inside relationship linkage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub type_tag: Option<String>,
}

impl ResourceIdentifier {
    /// Convert to a typed reference. Identifiers without an id are dropped;
    /// unknown type tags are kept as `MediaKind::Unknown`.
    pub fn to_reference(&self) -> Option<RelationshipReference> {
        let id = self.id.clone()?;
        let kind = self
            .type_tag
            .as_deref()
            .map(MediaKind::from_tag)
            .unwrap_or(MediaKind::Unknown);
        Some(RelationshipReference::new(id, kind))
    }
}

/// `links` object; only `self` is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceLinks {
    #[serde(default, rename = "self", deserialize_with = "lenient")]
    pub self_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_resource_document() {
        let doc = ResourceDocument::from_value(json!({
            "data": {
                "id": "v1",
                "type": "video",
                "attributes": {"title": "Intro", "duration": 120.5},
                "links": {"self": "videos/v1"}
            }
        }))
        .unwrap();

        let primary = doc.primary().unwrap();
        assert_eq!(primary.id.as_deref(), Some("v1"));
        assert_eq!(primary.kind(), MediaKind::Video);
        assert_eq!(primary.str_attr("title").as_deref(), Some("Intro"));
        assert_eq!(primary.f64_attr("duration"), Some(120.5));
        assert_eq!(
            primary.links.as_ref().unwrap().self_link.as_deref(),
            Some("videos/v1")
        );
    }

    #[test]
    fn test_array_data_and_included() {
        let doc = ResourceDocument::from_value(json!({
            "data": [
                {"id": "a", "type": "video", "attributes": {}},
                {"id": "b", "type": "collection", "attributes": {}}
            ],
            "included": [
                {"id": "c", "type": "article", "attributes": {}}
            ]
        }))
        .unwrap();

        assert!(doc.primary().is_none());
        assert_eq!(doc.primary_list().len(), 2);
        assert_eq!(doc.included.len(), 1);
    }

    #[test]
    fn test_mistyped_fields_degrade_to_defaults() {
        let doc = ResourceDocument::from_value(json!({
            "data": {
                "id": 7,
                "type": "video",
                "attributes": "not-an-object",
                "relationships": 3
            }
        }))
        .unwrap();

        let primary = doc.primary().unwrap();
        assert!(primary.id.is_none());
        assert_eq!(primary.kind(), MediaKind::Video);
        assert!(primary.attributes.is_empty());
        assert!(primary.relationships.is_empty());
    }

    #[test]
    fn test_short_data_array_stays_an_array() {
        // Arrays must never collapse into a single defaulted resource, no
        // matter how few elements they carry
        let doc = ResourceDocument::from_value(json!({
            "data": [
                {"id": "v1", "type": "video", "attributes": {"title": "Only hit"}}
            ]
        }))
        .unwrap();

        assert!(doc.primary().is_none());
        let list = doc.primary_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id.as_deref(), Some("v1"));
        assert_eq!(list[0].kind(), MediaKind::Video);
    }

    #[test]
    fn test_two_element_relationship_list_keeps_both_identifiers() {
        let doc = ResourceDocument::from_value(json!({
            "data": {
                "id": "home",
                "type": "view",
                "relationships": {
                    "featured": {"data": [
                        {"id": "c", "type": "collection"},
                        {"id": "a", "type": "video"}
                    ]}
                }
            }
        }))
        .unwrap();

        let featured = &doc.primary().unwrap().relationships["featured"];
        match featured.data.as_ref().unwrap() {
            RelationshipData::Many(identifiers) => {
                assert_eq!(identifiers.len(), 2);
                assert_eq!(identifiers[0].id.as_deref(), Some("c"));
                assert_eq!(identifiers[1].id.as_deref(), Some("a"));
            }
            RelationshipData::One(_) => panic!("array linkage decoded as a single identifier"),
        }
    }

    #[test]
    fn test_non_object_array_elements_are_skipped() {
        let doc = ResourceDocument::from_value(json!({
            "data": [
                {"id": "v1", "type": "video", "attributes": {}},
                "garbage",
                42
            ]
        }))
        .unwrap();

        let list = doc.primary_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_identifier_without_id_is_dropped() {
        let identifier = ResourceIdentifier {
            id: None,
            type_tag: Some("video".to_string()),
        };
        assert!(identifier.to_reference().is_none());
    }
}

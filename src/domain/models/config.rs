use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::domain::models::wire::Resource;

/// Server-delivered settings snapshot.
///
/// Decoded once per `initialize` from the config payload's
/// `data.attributes` and replaced wholesale on the store; never partially
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreConfig {
    pub views: ViewIds,
    pub ads: Option<AdsConfig>,
    pub metrics: Option<MetricsConfig>,
    pub authentication_required: bool,
}

/// Ids of the named entry-point views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewIds {
    pub homepage: Option<String>,
    pub splash: Option<String>,
    pub menu: Option<String>,
}

/// Ads feature toggle: provider name plus an opaque provider config map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdsConfig {
    pub provider: Option<String>,
    pub config: HashMap<String, Value>,
}

/// Analytics feature toggle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub interval_secs: Option<u64>,
    pub actions: Vec<String>,
}

impl StoreConfig {
    /// Decode a snapshot from the config resource. Missing or mistyped
    /// sections decode to their defaults; nothing here is fatal.
    pub fn from_resource(resource: &Resource) -> Self {
        let views = resource
            .object_attr("views")
            .map(|section| ViewIds {
                homepage: str_field(section, "homepage"),
                splash: str_field(section, "splash"),
                menu: str_field(section, "menu"),
            })
            .unwrap_or_default();

        let features = resource.object_attr("features");

        let ads = features
            .and_then(|section| section.get("ads"))
            .and_then(Value::as_object)
            .map(|section| AdsConfig {
                provider: str_field(section, "provider"),
                config: section
                    .get("config")
                    .and_then(Value::as_object)
                    .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default(),
            });

        let metrics = features
            .and_then(|section| section.get("metrics"))
            .and_then(Value::as_object)
            .map(|section| MetricsConfig {
                enabled: section
                    .get("enabled")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                interval_secs: section.get("interval").and_then(Value::as_u64),
                actions: section
                    .get("actions")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            });

        let authentication_required = features
            .and_then(|section| section.get("authentication"))
            .and_then(Value::as_object)
            .and_then(|section| section.get("required"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        StoreConfig {
            views,
            ads,
            metrics,
            authentication_required,
        }
    }
}

fn str_field(section: &Map<String, Value>, key: &str) -> Option<String> {
    section.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::wire::ResourceDocument;
    use serde_json::json;

    #[test]
    fn test_full_config_decodes() {
        let doc = ResourceDocument::from_value(json!({
            "data": {
                "id": "config",
                "type": "config",
                "attributes": {
                    "views": {"homepage": "home-1", "splash": "splash-1", "menu": "menu-1"},
                    "features": {
                        "ads": {"provider": "vast", "config": {"tag": "https://ads/tag"}},
                        "metrics": {"enabled": true, "interval": 30, "actions": ["play", "pause"]},
                        "authentication": {"required": true}
                    }
                }
            }
        }))
        .unwrap();

        let config = StoreConfig::from_resource(doc.primary().unwrap());
        assert_eq!(config.views.homepage.as_deref(), Some("home-1"));
        assert_eq!(config.views.menu.as_deref(), Some("menu-1"));

        let ads = config.ads.unwrap();
        assert_eq!(ads.provider.as_deref(), Some("vast"));
        assert_eq!(ads.config.get("tag"), Some(&json!("https://ads/tag")));

        let metrics = config.metrics.unwrap();
        assert!(metrics.enabled);
        assert_eq!(metrics.interval_secs, Some(30));
        assert_eq!(metrics.actions, vec!["play", "pause"]);

        assert!(config.authentication_required);
    }

    #[test]
    fn test_sparse_config_defaults() {
        let doc = ResourceDocument::from_value(json!({
            "data": {"id": "config", "type": "config", "attributes": {}}
        }))
        .unwrap();
        let config = StoreConfig::from_resource(doc.primary().unwrap());

        assert_eq!(config, StoreConfig::default());
        assert!(!config.authentication_required);
    }
}

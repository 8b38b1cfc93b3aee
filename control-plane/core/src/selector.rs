use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selector value matching every value of a tag.
pub const MATCH_ALL_TAG: &str = "*";

/// The tag naming the logical service a proxy belongs to.
pub const SERVICE_TAG: &str = "service";

/// A set of tag-match constraints. A value of `*` matches all values of that
/// key; a selector with no keys matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    #[serde(rename = "match", default)]
    pub tags: BTreeMap<String, String>,
}

// === impl Selector ===

impl Selector {
    /// A selector constraining only the `service` tag.
    pub fn service(value: impl Into<String>) -> Self {
        Self::from_iter([(SERVICE_TAG.to_string(), value.into())])
    }

    pub fn service_tag(&self) -> Option<&str> {
        self.tags.get(SERVICE_TAG).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Selector {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_under_match_key() {
        let selector = Selector::service("web");
        let json = serde_json::to_value(&selector).unwrap();
        assert_eq!(json, serde_json::json!({"match": {"service": "web"}}));
    }

    #[test]
    fn deserializes_missing_match_as_empty() {
        let selector: Selector = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(selector.tags.is_empty());
    }
}

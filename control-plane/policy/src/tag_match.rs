use mesh_control_plane_core::{Selector, MATCH_ALL_TAG};
use std::collections::BTreeMap;

/// Evaluates a selector against a concrete identity tag set.
///
/// A selector matches iff, for every key it carries, its value equals the
/// identity's value for that key or is the `*` wildcard. A selector with no
/// keys matches everything.
pub fn selector_matches(selector: &Selector, identity: &BTreeMap<String, String>) -> bool {
    selector.tags.iter().all(|(key, value)| {
        value == MATCH_ALL_TAG || identity.get(key).map(|tag| tag == value).unwrap_or(false)
    })
}

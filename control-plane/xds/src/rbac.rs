//! Generated access-control configuration.
//!
//! These objects are produced by the configurer and installed into a network
//! filter; they are never persisted. Enforcement is default-deny: traffic
//! from a principal matching no policy is rejected, and an empty policy set
//! denies everything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Matches a client identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    /// Matches any client.
    Any,

    /// Matches a client whose certified identity equals the given SPIFFE URI.
    Authenticated { principal_name: String },
}

/// Matches the destination of a connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Matches any destination port or path.
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Allow,
    Deny,
}

/// One named policy: which principals may exercise which permissions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacPolicy {
    pub permissions: Vec<Permission>,
    pub principals: Vec<Principal>,
}

/// All policies installed into one filter, keyed by policy name. The map is
/// ordered so generated configuration is byte-for-byte reproducible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacRules {
    pub action: Action,
    pub policies: BTreeMap<String, RbacPolicy>,
}

/// Network RBAC filter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRbac {
    pub rules: RbacRules,
    pub stat_prefix: String,
}

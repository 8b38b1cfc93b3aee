//! Spec payloads, one shape per resource type.

use crate::{registry, resource::ResourceType, selector::Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Polymorphic resource payload, restricted to the shape declared by the
/// resource's type tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Spec {
    Mesh(MeshSpec),
    AccessPermission(AccessPermissionSpec),
    TrafficRoute(TrafficRouteSpec),
}

/// Mesh-wide settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshSpec {
    #[serde(default)]
    pub mtls: MtlsSettings,
}

/// Mutual-TLS settings for a mesh. RBAC filters are only generated for meshes
/// with mTLS enabled, since principals are derived from client certificates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtlsSettings {
    #[serde(default)]
    pub enabled: bool,
}

/// Grants traffic from `sources` to `destinations`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPermissionSpec {
    #[serde(default)]
    pub sources: Vec<Selector>,
    #[serde(default)]
    pub destinations: Vec<Selector>,
}

/// Splits traffic matching `sources`/`destinations` across weighted
/// destinations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRouteSpec {
    #[serde(default)]
    pub sources: Vec<Selector>,
    #[serde(default)]
    pub destinations: Vec<Selector>,
    #[serde(default)]
    pub conf: Vec<WeightedDestination>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedDestination {
    pub weight: u32,
    #[serde(default)]
    pub destination: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("unknown resource type {0:?}")]
    UnknownType(String),

    #[error("malformed {kind} spec: {source}")]
    Malformed {
        kind: ResourceType,
        #[source]
        source: serde_json::Error,
    },
}

// === impl Spec ===

impl Spec {
    pub fn kind(&self) -> ResourceType {
        match self {
            Self::Mesh(_) => registry::MESH.name,
            Self::AccessPermission(_) => registry::ACCESS_PERMISSION.name,
            Self::TrafficRoute(_) => registry::TRAFFIC_ROUTE.name,
        }
    }

    /// Serializes the payload alone, without any envelope fields.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Mesh(spec) => serde_json::to_value(spec),
            Self::AccessPermission(spec) => serde_json::to_value(spec),
            Self::TrafficRoute(spec) => serde_json::to_value(spec),
        }
    }

    /// Decodes a payload of the given type. Unknown fields are ignored so a
    /// full envelope document can be decoded in place.
    pub fn from_json(kind: ResourceType, value: serde_json::Value) -> Result<Self, SpecError> {
        let malformed = |source| SpecError::Malformed { kind, source };
        if kind == registry::MESH.name {
            serde_json::from_value(value).map(Self::Mesh).map_err(malformed)
        } else if kind == registry::ACCESS_PERMISSION.name {
            serde_json::from_value(value)
                .map(Self::AccessPermission)
                .map_err(malformed)
        } else if kind == registry::TRAFFIC_ROUTE.name {
            serde_json::from_value(value)
                .map(Self::TrafficRoute)
                .map_err(malformed)
        } else {
            Err(SpecError::UnknownType(kind.as_str().to_string()))
        }
    }
}

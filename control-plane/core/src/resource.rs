use crate::spec::Spec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tag identifying a resource schema, e.g. `AccessPermission`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType(&'static str);

/// Opaque, monotonically increasing resource version.
///
/// Only the store advances a version; callers carry it back unchanged on
/// conditional updates.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Version(u64);

/// Identity of a persisted resource. `(type, mesh, name)` is globally unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceMeta {
    pub mesh: String,
    pub name: String,
    pub version: Version,
}

/// The unit of persistence: identity plus a typed spec payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    meta: ResourceMeta,
    spec: Spec,
}

/// An ordered collection of resources of one type, with an optional
/// continuation token for the next page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceList {
    pub items: Vec<Resource>,
    pub next: Option<String>,
}

/// Returned by [`Resource::set_spec`] when the payload's shape does not match
/// the resource's declared type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("spec of type {found} does not match resource type {expected}")]
pub struct TypeMismatch {
    pub expected: ResourceType,
    pub found: ResourceType,
}

// === impl ResourceType ===

impl ResourceType {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq<str> for ResourceType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

// === impl Version ===

impl Version {
    /// A resource that has not been persisted yet.
    pub const ZERO: Self = Self(0);

    /// The version assigned on a successful create.
    pub const INITIAL: Self = Self(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// === impl Resource ===

impl Resource {
    pub fn new(mesh: impl Into<String>, name: impl Into<String>, spec: Spec) -> Self {
        Self {
            meta: ResourceMeta {
                mesh: mesh.into(),
                name: name.into(),
                version: Version::ZERO,
            },
            spec,
        }
    }

    pub fn kind(&self) -> ResourceType {
        self.spec.kind()
    }

    pub fn meta(&self) -> &ResourceMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut ResourceMeta {
        &mut self.meta
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    /// Replaces the spec payload, rejecting a payload of a different type.
    pub fn set_spec(&mut self, spec: Spec) -> Result<(), TypeMismatch> {
        if spec.kind() != self.spec.kind() {
            return Err(TypeMismatch {
                expected: self.spec.kind(),
                found: spec.kind(),
            });
        }
        self.spec = spec;
        Ok(())
    }
}

use crate::error::StoreError;
use mesh_control_plane_core::{Resource, ResourceList, ResourceType};
use std::sync::Arc;

/// A page request for [`ResourceStore::list`]. An absent token means "from
/// the start"; tokens are opaque and only valid against the store that issued
/// them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub size: Option<usize>,
    pub token: Option<String>,
}

/// Typed, versioned CRUD over policy resources keyed by `(type, mesh, name)`.
///
/// Every backend must provide read-after-write consistency for a single
/// client session, reject stale updates via the version check, and make each
/// operation a single atomic unit. Implementations are safe for concurrent
/// callers without external locking.
///
/// Operations surface errors synchronously; retry-on-[`Conflict`] loops are a
/// caller policy, never assumed here. Cancellation is structural: dropping
/// the returned future abandons the operation, and callers apply deadlines
/// with `tokio::time::timeout`.
///
/// [`Conflict`]: StoreError::Conflict
#[async_trait::async_trait]
pub trait ResourceStore: Send + Sync {
    /// Persists a new resource, assigning version 1.
    async fn create(&self, resource: &mut Resource) -> Result<(), StoreError>;

    /// Returns the stored resource for the key.
    async fn get(&self, kind: ResourceType, mesh: &str, name: &str)
        -> Result<Resource, StoreError>;

    /// Replaces the stored resource iff the carried version matches the
    /// stored one; on success the resource carries the incremented version.
    async fn update(&self, resource: &mut Resource) -> Result<(), StoreError>;

    /// Removes the resource for the key.
    async fn delete(&self, kind: ResourceType, mesh: &str, name: &str) -> Result<(), StoreError>;

    /// Lists resources of one type within a mesh, in stable (name) order.
    async fn list(
        &self,
        kind: ResourceType,
        mesh: &str,
        page: &Page,
    ) -> Result<ResourceList, StoreError>;
}

pub type SharedStore = Arc<dyn ResourceStore>;

// === impl Page ===

impl Page {
    pub fn size(size: usize) -> Self {
        Self {
            size: Some(size),
            token: None,
        }
    }

    pub fn next(&self, token: impl Into<String>) -> Self {
        Self {
            size: self.size,
            token: Some(token.into()),
        }
    }
}

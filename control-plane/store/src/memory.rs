use crate::{
    error::StoreError,
    store::{Page, ResourceStore},
};
use dashmap::{mapref::entry::Entry, DashMap};
use mesh_control_plane_core::{Resource, ResourceList, ResourceType, Version};

/// An in-process [`ResourceStore`] backend.
///
/// Entries live in a sharded concurrent map, so operations on unrelated
/// resources do not contend and each create/update/delete is atomic under
/// the entry's shard lock (updates are a compare-and-swap on the version).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<Key, Resource>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Key {
    kind: &'static str,
    mesh: String,
    name: String,
}

// === impl MemoryStore ===

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Key {
    fn new(kind: ResourceType, mesh: &str, name: &str) -> Self {
        Self {
            kind: kind.as_str(),
            mesh: mesh.to_string(),
            name: name.to_string(),
        }
    }

    fn of(resource: &Resource) -> Self {
        Self::new(resource.kind(), &resource.meta().mesh, &resource.meta().name)
    }
}

#[async_trait::async_trait]
impl ResourceStore for MemoryStore {
    async fn create(&self, resource: &mut Resource) -> Result<(), StoreError> {
        match self.entries.entry(Key::of(resource)) {
            Entry::Occupied(_) => Err(StoreError::already_exists(
                resource.kind(),
                &resource.meta().mesh,
                &resource.meta().name,
            )),
            Entry::Vacant(entry) => {
                resource.meta_mut().version = Version::INITIAL;
                entry.insert(resource.clone());
                Ok(())
            }
        }
    }

    async fn get(
        &self,
        kind: ResourceType,
        mesh: &str,
        name: &str,
    ) -> Result<Resource, StoreError> {
        self.entries
            .get(&Key::new(kind, mesh, name))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::not_found(kind, mesh, name))
    }

    async fn update(&self, resource: &mut Resource) -> Result<(), StoreError> {
        let mut stored = self
            .entries
            .get_mut(&Key::of(resource))
            .ok_or_else(|| {
                StoreError::not_found(resource.kind(), &resource.meta().mesh, &resource.meta().name)
            })?;
        let current = stored.meta().version;
        if current != resource.meta().version {
            return Err(StoreError::Conflict {
                kind: resource.kind(),
                mesh: resource.meta().mesh.clone(),
                name: resource.meta().name.clone(),
                stored: current,
                submitted: resource.meta().version,
            });
        }
        resource.meta_mut().version = current.next();
        *stored = resource.clone();
        Ok(())
    }

    async fn delete(&self, kind: ResourceType, mesh: &str, name: &str) -> Result<(), StoreError> {
        self.entries
            .remove(&Key::new(kind, mesh, name))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(kind, mesh, name))
    }

    async fn list(
        &self,
        kind: ResourceType,
        mesh: &str,
        page: &Page,
    ) -> Result<ResourceList, StoreError> {
        let mut items = self
            .entries
            .iter()
            .filter(|entry| entry.key().kind == kind.as_str() && entry.key().mesh == mesh)
            .map(|entry| entry.value().clone())
            .collect::<Vec<_>>();
        items.sort_by(|a, b| a.meta().name.cmp(&b.meta().name));

        let start = match &page.token {
            None => 0,
            Some(token) => items
                .iter()
                .position(|r| r.meta().name == *token)
                .ok_or_else(|| StoreError::InvalidPageToken(token.clone()))?,
        };
        // A zero size would return an empty page whose continuation token
        // never advances; treat it as unlimited instead.
        let size = page.size.filter(|size| *size > 0).unwrap_or(usize::MAX);
        let next = items
            .get(start.saturating_add(size))
            .map(|r| r.meta().name.clone());
        let items = items.into_iter().skip(start).take(size).collect();
        Ok(ResourceList { items, next })
    }
}

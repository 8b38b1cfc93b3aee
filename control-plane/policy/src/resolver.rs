use crate::tag_match::selector_matches;
use mesh_control_plane_core::{Resource, Spec, ACCESS_PERMISSION};
use mesh_control_plane_store::{Page, SharedStore, StoreError};
use std::collections::BTreeMap;

/// Selects the access permissions applicable to a proxy identity.
///
/// A permission applies when any of its `destinations` selectors matches the
/// identity (the proxy is the destination of the traffic being allowed).
/// Policies are additive: every match is returned, with no best-match
/// precedence. The resolver is a read-only function of store state and adds
/// no caching of its own.
pub struct PolicyResolver {
    store: SharedStore,
}

// === impl PolicyResolver ===

impl PolicyResolver {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn resolve(
        &self,
        mesh: &str,
        identity: &BTreeMap<String, String>,
    ) -> Result<Vec<Resource>, StoreError> {
        let list = self
            .store
            .list(ACCESS_PERMISSION.name, mesh, &Page::default())
            .await?;
        Ok(list
            .items
            .into_iter()
            .filter(|resource| match resource.spec() {
                Spec::AccessPermission(spec) => spec
                    .destinations
                    .iter()
                    .any(|selector| selector_matches(selector, identity)),
                _ => false,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_control_plane_core::{spec::AccessPermissionSpec, Selector};
    use mesh_control_plane_store::{MemoryStore, ResourceStore};
    use std::sync::Arc;

    async fn seed(store: &dyn ResourceStore, mesh: &str, name: &str, destination: &str) {
        let mut resource = Resource::new(
            mesh,
            name,
            Spec::AccessPermission(AccessPermissionSpec {
                sources: vec![Selector::service("*")],
                destinations: vec![Selector::service(destination)],
            }),
        );
        store.create(&mut resource).await.unwrap();
    }

    fn identity(service: &str) -> BTreeMap<String, String> {
        [("service".to_string(), service.to_string())]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn returns_every_matching_permission() {
        let store = Arc::new(MemoryStore::new());
        seed(&*store, "default", "allow-any", "*").await;
        seed(&*store, "default", "allow-web", "web").await;
        seed(&*store, "default", "allow-api", "api").await;

        let resolver = PolicyResolver::new(store);
        let resolved = resolver.resolve("default", &identity("web")).await.unwrap();
        let names = resolved
            .iter()
            .map(|r| r.meta().name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["allow-any", "allow-web"]);
    }

    #[tokio::test]
    async fn ignores_other_meshes() {
        let store = Arc::new(MemoryStore::new());
        seed(&*store, "other", "allow-web", "web").await;

        let resolver = PolicyResolver::new(store);
        let resolved = resolver.resolve("default", &identity("web")).await.unwrap();
        assert!(resolved.is_empty());
    }
}

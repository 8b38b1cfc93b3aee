use crate::{
    builder::{ConfigurerError, ListenerBuilder},
    listener::Listener,
    network_rbac::network_rbac,
};
use mesh_control_plane_core::{Spec, ACCESS_PERMISSION, MESH};
use mesh_control_plane_store::{Page, SharedStore, StoreError};
use thiserror::Error;
use tracing::debug;

/// Builds the listener configuration for one proxy from the current store
/// state.
///
/// Each run reads fully committed resource versions, but distinct resources
/// are not read transactionally with one another. On any error the caller
/// must keep serving its last good snapshot; a failed run never yields a
/// partially built listener set.
pub struct SnapshotGenerator {
    store: SharedStore,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Configurer(#[from] ConfigurerError),
}

// === impl SnapshotGenerator ===

impl SnapshotGenerator {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Runs the configuration pipeline over each of the proxy's listeners.
    ///
    /// Access control is generated only for meshes with mTLS enabled, since
    /// principals are derived from client certificates. The full mesh
    /// permission list feeds the filter; identity-scoping of permissions is
    /// a resolver concern, not applied here.
    pub async fn snapshot(
        &self,
        mesh: &str,
        listeners: Vec<Listener>,
    ) -> Result<Vec<Listener>, SnapshotError> {
        let mesh_resource = self.store.get(MESH.name, mesh, mesh).await?;
        let rbac_enabled = match mesh_resource.spec() {
            Spec::Mesh(spec) => spec.mtls.enabled,
            _ => false,
        };
        let permissions = self
            .store
            .list(ACCESS_PERMISSION.name, mesh, &Page::default())
            .await?
            .items;
        debug!(
            %mesh,
            rbac_enabled,
            permissions = permissions.len(),
            listeners = listeners.len(),
            "generating snapshot"
        );

        listeners
            .into_iter()
            .map(|listener| {
                ListenerBuilder::new()
                    .add_opt(network_rbac(rbac_enabled, permissions.clone()))
                    .build(listener)
                    .map_err(SnapshotError::from)
            })
            .collect()
    }
}

use mesh_control_plane_core::{ResourceType, Version};
use thiserror::Error;

/// Errors surfaced by any [`ResourceStore`] backend.
///
/// Only [`Backend`] is worth a blind retry; every other variant indicates a
/// programming or data error to be surfaced to the operator.
///
/// [`ResourceStore`]: crate::ResourceStore
/// [`Backend`]: StoreError::Backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource {kind} {mesh}/{name} not found")]
    NotFound {
        kind: ResourceType,
        mesh: String,
        name: String,
    },

    #[error("resource {kind} {mesh}/{name} already exists")]
    AlreadyExists {
        kind: ResourceType,
        mesh: String,
        name: String,
    },

    #[error(
        "resource {kind} {mesh}/{name} version conflict: stored {stored}, submitted {submitted}"
    )]
    Conflict {
        kind: ResourceType,
        mesh: String,
        name: String,
        stored: Version,
        submitted: Version,
    },

    #[error("invalid page token {0:?}")]
    InvalidPageToken(String),

    #[error("storage backend unavailable")]
    Backend(#[source] anyhow::Error),

    #[error("operation canceled")]
    Canceled,
}

// === impl StoreError ===

impl StoreError {
    pub fn not_found(kind: ResourceType, mesh: &str, name: &str) -> Self {
        Self::NotFound {
            kind,
            mesh: mesh.to_string(),
            name: name.to_string(),
        }
    }

    pub fn already_exists(kind: ResourceType, mesh: &str, name: &str) -> Self {
        Self::AlreadyExists {
            kind,
            mesh: mesh.to_string(),
            name: name.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

use crate::{
    core::{Resource, ResourceList, ResourceType},
    store::{Page, ResourceStore, StoreError},
};
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

/// Counts store operations by resource type, operation, and outcome.
pub struct StoreMetrics<S> {
    inner: S,
    operations: Family<OpLabels, Counter>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct OpLabels {
    kind: String,
    operation: String,
    result: String,
}

// === impl StoreMetrics ===

impl<S> StoreMetrics<S> {
    pub fn register(inner: S, prom: &mut Registry) -> Self {
        let operations = Family::default();
        prom.register(
            "resource_store_operations",
            "Count of resource store operations",
            operations.clone(),
        );
        Self { inner, operations }
    }

    fn record<T>(&self, operation: &str, kind: ResourceType, result: &Result<T, StoreError>) {
        self.operations
            .get_or_create(&OpLabels {
                kind: kind.as_str().to_string(),
                operation: operation.to_string(),
                result: if result.is_ok() { "ok" } else { "error" }.to_string(),
            })
            .inc();
    }
}

#[async_trait::async_trait]
impl<S: ResourceStore> ResourceStore for StoreMetrics<S> {
    async fn create(&self, resource: &mut Resource) -> Result<(), StoreError> {
        let result = self.inner.create(resource).await;
        self.record("create", resource.kind(), &result);
        result
    }

    async fn get(
        &self,
        kind: ResourceType,
        mesh: &str,
        name: &str,
    ) -> Result<Resource, StoreError> {
        let result = self.inner.get(kind, mesh, name).await;
        self.record("get", kind, &result);
        result
    }

    async fn update(&self, resource: &mut Resource) -> Result<(), StoreError> {
        let result = self.inner.update(resource).await;
        self.record("update", resource.kind(), &result);
        result
    }

    async fn delete(&self, kind: ResourceType, mesh: &str, name: &str) -> Result<(), StoreError> {
        let result = self.inner.delete(kind, mesh, name).await;
        self.record("delete", kind, &result);
        result
    }

    async fn list(
        &self,
        kind: ResourceType,
        mesh: &str,
        page: &Page,
    ) -> Result<ResourceList, StoreError> {
        let result = self.inner.list(kind, mesh, page).await;
        self.record("list", kind, &result);
        result
    }
}

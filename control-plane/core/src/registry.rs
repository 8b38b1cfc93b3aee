use crate::{
    resource::{Resource, ResourceType},
    spec::{AccessPermissionSpec, MeshSpec, Spec, TrafficRouteSpec},
};
use ahash::AHashMap as HashMap;

/// Describes a registered resource type: its tag, its URL path segment, and a
/// factory producing an empty, correctly shaped spec.
pub struct ResourceTypeDescriptor {
    pub name: ResourceType,
    pub path: &'static str,
    new_spec: fn() -> Spec,
}

pub static MESH: ResourceTypeDescriptor = ResourceTypeDescriptor {
    name: ResourceType::new("Mesh"),
    path: "meshes",
    new_spec: new_mesh_spec,
};

pub static ACCESS_PERMISSION: ResourceTypeDescriptor = ResourceTypeDescriptor {
    name: ResourceType::new("AccessPermission"),
    path: "access-permissions",
    new_spec: new_access_permission_spec,
};

pub static TRAFFIC_ROUTE: ResourceTypeDescriptor = ResourceTypeDescriptor {
    name: ResourceType::new("TrafficRoute"),
    path: "traffic-routes",
    new_spec: new_traffic_route_spec,
};

fn new_mesh_spec() -> Spec {
    Spec::Mesh(MeshSpec::default())
}

fn new_access_permission_spec() -> Spec {
    Spec::AccessPermission(AccessPermissionSpec::default())
}

fn new_traffic_route_spec() -> Spec {
    Spec::TrafficRoute(TrafficRouteSpec::default())
}

/// Maps type tags and URL path segments to descriptors.
pub struct Registry {
    by_type: HashMap<&'static str, &'static ResourceTypeDescriptor>,
    by_path: HashMap<&'static str, &'static ResourceTypeDescriptor>,
}

// === impl ResourceTypeDescriptor ===

impl ResourceTypeDescriptor {
    /// Produces an empty, correctly shaped resource for this type.
    pub fn new_resource(&self, mesh: impl Into<String>, name: impl Into<String>) -> Resource {
        Resource::new(mesh, name, self.empty_spec())
    }

    pub fn empty_spec(&self) -> Spec {
        (self.new_spec)()
    }
}

// === impl Registry ===

impl Registry {
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            by_path: HashMap::new(),
        }
    }

    pub fn register(&mut self, descriptor: &'static ResourceTypeDescriptor) {
        self.by_type.insert(descriptor.name.as_str(), descriptor);
        self.by_path.insert(descriptor.path, descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&'static ResourceTypeDescriptor> {
        self.by_type.get(name).copied()
    }

    pub fn get_by_path(&self, path: &str) -> Option<&'static ResourceTypeDescriptor> {
        self.by_path.get(path).copied()
    }
}

impl Default for Registry {
    /// A registry holding all built-in resource types.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(&MESH);
        registry.register(&ACCESS_PERMISSION);
        registry.register(&TRAFFIC_ROUTE);
        registry
    }
}

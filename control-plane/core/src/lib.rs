#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod registry;
mod resource;
mod selector;
pub mod spec;

pub use self::{
    registry::{Registry, ResourceTypeDescriptor, ACCESS_PERMISSION, MESH, TRAFFIC_ROUTE},
    resource::{Resource, ResourceList, ResourceMeta, ResourceType, TypeMismatch, Version},
    selector::{Selector, MATCH_ALL_TAG, SERVICE_TAG},
    spec::Spec,
};

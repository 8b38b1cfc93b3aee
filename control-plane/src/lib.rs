#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use mesh_control_plane_api as api;
pub use mesh_control_plane_core as core;
pub use mesh_control_plane_policy as policy;
pub use mesh_control_plane_store as store;
pub use mesh_control_plane_xds as xds;

mod admin;
mod args;
mod metrics;
mod serve;

pub use self::{args::Args, metrics::StoreMetrics};

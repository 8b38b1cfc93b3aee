#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod builder;
mod generator;
mod listener;
mod network_rbac;
mod rbac;
mod stats;


pub use self::{
    builder::{ConfigurerError, ListenerBuilder, ListenerConfigurer},
    generator::{SnapshotError, SnapshotGenerator},
    listener::{wellknown, Filter, FilterChain, FilterConfig, Listener, TcpProxy},
    network_rbac::{network_rbac, NetworkRbacConfigurer},
    rbac::{Action, NetworkRbac, Permission, Principal, RbacPolicy, RbacRules},
    stats::sanitize_metric,
};

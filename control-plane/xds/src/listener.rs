use crate::rbac::NetworkRbac;
use serde::{Deserialize, Serialize};

/// Well-known data-plane filter names.
pub mod wellknown {
    pub const ROLE_BASED_ACCESS_CONTROL: &str = "envoy.filters.network.rbac";
    pub const TCP_PROXY: &str = "envoy.filters.network.tcp_proxy";
}

/// A proxy listener: accepts connections and routes them through an ordered
/// chain of filters. Built fresh per pipeline invocation and discarded once
/// delivered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,
    pub filter_chains: Vec<FilterChain>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChain {
    pub filters: Vec<Filter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub config: FilterConfig,
}

/// Typed filter configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterConfig {
    NetworkRbac(NetworkRbac),
    TcpProxy(TcpProxy),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpProxy {
    pub cluster: String,
    pub stat_prefix: String,
}

// === impl Listener ===

impl Listener {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter_chains: Vec::new(),
        }
    }

    pub fn with_chain(mut self, chain: FilterChain) -> Self {
        self.filter_chains.push(chain);
        self
    }
}

// === impl Filter ===

impl Filter {
    /// A TCP proxy filter forwarding to the given cluster.
    pub fn tcp_proxy(cluster: impl Into<String>) -> Self {
        let cluster = cluster.into();
        Self {
            name: wellknown::TCP_PROXY.to_string(),
            config: FilterConfig::TcpProxy(TcpProxy {
                stat_prefix: cluster.clone(),
                cluster,
            }),
        }
    }
}

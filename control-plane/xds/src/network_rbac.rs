use crate::{
    builder::{ConfigurerError, ListenerConfigurer},
    listener::{wellknown, Filter, FilterConfig, Listener},
    rbac::{Action, NetworkRbac, Permission, Principal, RbacPolicy, RbacRules},
    stats::sanitize_metric,
};
use mesh_control_plane_core::{
    spec::AccessPermissionSpec, Resource, ResourceMeta, Spec, ACCESS_PERMISSION, MATCH_ALL_TAG,
    SERVICE_TAG,
};
use std::collections::BTreeMap;

/// Returns the RBAC configurer when access control is enabled for the mesh.
/// When disabled, nothing is registered into the pipeline.
pub fn network_rbac(enabled: bool, permissions: Vec<Resource>) -> Option<NetworkRbacConfigurer> {
    enabled.then_some(NetworkRbacConfigurer { permissions })
}

/// Translates the mesh's access permissions into a network RBAC filter and
/// prepends it to every filter chain, so access control is the first filter
/// evaluated regardless of what other configurers install.
pub struct NetworkRbacConfigurer {
    /// Access permissions to enforce.
    permissions: Vec<Resource>,
}

// === impl NetworkRbacConfigurer ===

impl ListenerConfigurer for NetworkRbacConfigurer {
    fn configure(&self, listener: &mut Listener) -> Result<(), ConfigurerError> {
        let filter = self.rbac_filter(&listener.name)?;
        for chain in &mut listener.filter_chains {
            chain.filters.insert(0, filter.clone());
        }
        Ok(())
    }
}

impl NetworkRbacConfigurer {
    fn rbac_filter(&self, listener_name: &str) -> Result<Filter, ConfigurerError> {
        let mut policies = BTreeMap::new();
        for resource in &self.permissions {
            let spec = match resource.spec() {
                Spec::AccessPermission(spec) => spec,
                _ => {
                    return Err(ConfigurerError::UnexpectedKind {
                        expected: ACCESS_PERMISSION.name,
                        found: resource.kind(),
                    })
                }
            };
            policies.insert(resource.meta().name.clone(), policy(resource.meta(), spec));
        }

        Ok(Filter {
            name: wellknown::ROLE_BASED_ACCESS_CONTROL.to_string(),
            config: FilterConfig::NetworkRbac(NetworkRbac {
                rules: RbacRules {
                    action: Action::Allow,
                    policies,
                },
                stat_prefix: rbac_stat_prefix(listener_name),
            }),
        })
    }
}

fn policy(meta: &ResourceMeta, spec: &AccessPermissionSpec) -> RbacPolicy {
    let principals = spec
        .sources
        .iter()
        .map(|source| {
            let service = source.tags.get(SERVICE_TAG).map(String::as_str);
            match service {
                Some(MATCH_ALL_TAG) => Principal::Any,
                _ => Principal::Authenticated {
                    principal_name: format!(
                        "spiffe://{}/{}",
                        meta.mesh,
                        service.unwrap_or_default()
                    ),
                },
            }
        })
        .collect();

    RbacPolicy {
        // Matches any destination port: a permission scoped to one service
        // also admits traffic to any other service reachable through the
        // same chain. Known limitation, kept until destination selectors
        // participate in rule generation.
        permissions: vec![Permission::Any],
        principals,
    }
}

/// The metric namespace for a listener's allow/deny counters, e.g.
/// `inbound_127_0_0_1_21011rbac.` emitting `...rbac.allowed`. The trailing
/// separator keeps the counters nested under the listener's namespace.
fn rbac_stat_prefix(listener_name: &str) -> String {
    format!("{}rbac.", sanitize_metric(listener_name))
}
